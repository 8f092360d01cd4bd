//! Shared building blocks for backend services.
//!
//! - `error_code`: the platform error-code taxonomy and its startup registry
//! - `i18n`: locale handling, fuzzy locale matching and message lookup
//! - `response`: the JSON envelope and error-to-envelope mapping
//! - `page`: paging parameters and metadata
//! - `config`: environment-driven settings

pub mod config;
pub mod error_code;
pub mod i18n;
pub mod page;
pub mod response;
