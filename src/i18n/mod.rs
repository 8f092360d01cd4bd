//! Internationalization (i18n) support shared by every service.
//!
//! # Architecture
//!
//! - `locale`: locale code normalization and the coarse "fuzzy" locale form
//! - `matcher`: picks the best localized record for a requested locale
//! - `resolver`: derives the request locale from headers
//! - `messages`: message lookup keyed by (locale, key)
//! - `format`: placeholder substitution for message templates
//!
//! # Example
//!
//! ```rust
//! use service_commons::i18n::fuzzy_match_by_locale;
//!
//! let titles = vec![("en", "Hello"), ("zh_hk", "你好"), ("fr_fr", "Bonjour")];
//! let best = fuzzy_match_by_locale(&titles, "zh-TW", |t| Some(t.0));
//! assert_eq!(best.map(|t| t.1), Some("你好"));
//! ```

mod format;
mod locale;
mod matcher;
mod messages;
mod resolver;

pub use format::{format_indexed, format_positional, replace_named};
pub use locale::{
    is_chinese, is_traditional_chinese, language_prefix, normalize, parse_to_fuzzy_locale,
    LocaleCode, TRADITIONAL_CHINESE_LOCALES, ZH, ZH_CN, ZH_HANT, ZH_HK, ZH_MO, ZH_TW,
};
pub use matcher::{
    fuzzy_field_match, fuzzy_field_match_with_default, fuzzy_match, fuzzy_match_by_locale,
    fuzzy_match_with_default, DEFAULT_RECORD_LOCALE,
};
pub use messages::{message, message_named, I18nError, MessageSource, StaticMessageSource};
pub use resolver::{
    FixedLocale, LocaleCustomizer, LocaleResolver, LocaleSource, RequestLocale,
    SimpleLocaleCustomizer, CUSTOM_LANGUAGE_HEADER, DEFAULT_LOCALE_HEADER,
};
