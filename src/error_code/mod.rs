//! Error-code taxonomy shared by every service.
//!
//! An error code is named `E` followed by ten digits, `EMMMMXXXXXX`: `MMMM`
//! identifies the declaring module and `XXXXXX` the error within it. The
//! numeric value of the name (leading zeros dropped) is the code returned in
//! API responses, so codes must be unique platform-wide.
//!
//! # Architecture
//!
//! - `ErrorCode`: the capability every error-code enum implements
//! - `error_codes!`: declares an enum of codes together with its discovery handle
//! - `discovery`: how the registry finds error-code types
//! - `registry`: the scan that validates and indexes every discovered code
//! - `common`: codes shared by all services (`E0000xxxxxx`)
//! - `business`: the error type raised with a code

mod business;
mod common;
mod discovery;
mod registry;

pub use business::{exception_and_format, format_message, i18n_exception, BusinessError};
pub use common::CommonErrorCode;
pub use discovery::{
    CandidateType, DiscoveryError, ErrorCodeEnum, StaticDiscovery, TypeDiscovery, TypeHandle,
};
pub use registry::{
    ErrorCodeRegistry, RegisteredCode, ScanDiagnostic, ScanError, SharedRegistry,
};

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// Width of the zero-padded numeric part used for namespace prefixes.
pub const CODE_WIDTH: usize = 10;

/// Number of leading digits that identify a code's namespace.
pub const NAMESPACE_PREFIX_LEN: usize = 6;

/// An error-code name whose numeric part cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed error code name '{name}': {source}")]
pub struct MalformedName {
    pub name: String,
    #[source]
    pub source: ParseIntError,
}

/// Derive the numeric code from an error-code name.
///
/// The first character is a fixed letter prefix and is dropped; the rest must
/// parse as an unsigned integer.
///
/// # Example
/// ```
/// use service_commons::error_code::parse_code;
///
/// assert_eq!(parse_code("E0000000400").unwrap(), 400);
/// assert!(parse_code("XABC").is_err());
/// ```
pub fn parse_code(name: &str) -> Result<u64, MalformedName> {
    let digits = name
        .char_indices()
        .nth(1)
        .map_or("", |(idx, _)| &name[idx..]);
    digits.parse::<u64>().map_err(|source| MalformedName {
        name: name.to_string(),
        source,
    })
}

/// Namespace prefix of a code: the first six characters of the code
/// zero-padded to ten digits.
pub fn namespace_prefix(code: u64) -> String {
    let padded = format!("{:0width$}", code, width = CODE_WIDTH);
    padded.chars().take(NAMESPACE_PREFIX_LEN).collect()
}

/// A named, numeric-coded domain error.
///
/// Implemented by error-code enums through [`error_codes!`](crate::error_codes).
pub trait ErrorCode: fmt::Debug + Send + Sync + 'static {
    /// Declared name, e.g. `E0000000400`.
    fn name(&self) -> &'static str;

    /// Message in the service's local language.
    fn local_message(&self) -> &'static str;

    /// Message used when no localization is available. Also serves as the
    /// i18n key for localized error messages.
    fn default_message(&self) -> &'static str {
        self.local_message()
    }

    /// Numeric code, or the parse failure for a malformed name.
    fn try_code(&self) -> Result<u64, MalformedName> {
        parse_code(self.name())
    }

    /// Numeric code.
    ///
    /// Malformed names yield `0`; [`ErrorCodeRegistry::scan`] refuses them at
    /// startup, so this only happens for codes that were never registered.
    fn code(&self) -> u64 {
        self.try_code().unwrap_or_default()
    }

    /// Raise this code with its default message.
    fn exception(&self) -> BusinessError {
        BusinessError::with_code(self.default_message(), self.code())
    }

    /// Raise this code with a custom message.
    fn exception_with(&self, message: &str) -> BusinessError {
        BusinessError::with_code(message, self.code())
    }

    /// Raise this code with its default message and an underlying cause.
    fn exception_caused(&self, cause: anyhow::Error) -> BusinessError {
        self.exception().with_source(cause)
    }
}

/// Declare an error-code enum.
///
/// Each variant lists its local message and, optionally, its default
/// message. The macro implements [`ErrorCode`] and [`ErrorCodeEnum`] so that
/// the enum can be registered with a [`StaticDiscovery`].
///
/// ```
/// use service_commons::error_code::ErrorCode;
///
/// service_commons::error_codes! {
///     /// Order service errors.
///     pub enum OrderErrorCode {
///         E0001000001 => ("訂單不存在", "Order not found"),
///         E0001000002 => ("Order already paid"),
///     }
/// }
///
/// assert_eq!(OrderErrorCode::E0001000001.code(), 1_000_001);
/// assert_eq!(OrderErrorCode::E0001000002.default_message(), "Order already paid");
/// ```
#[macro_export]
macro_rules! error_codes {
    (@default $local:expr) => { $local };
    (@default $local:expr, $default:expr) => { $default };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($local:expr $(, $default:expr)?)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $crate::error_code::ErrorCode for $name {
            fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }

            fn local_message(&self) -> &'static str {
                match self {
                    $( Self::$variant => $local, )*
                }
            }

            fn default_message(&self) -> &'static str {
                match self {
                    $( Self::$variant => $crate::error_codes!(@default $local $(, $default)?), )*
                }
            }
        }

        impl $crate::error_code::ErrorCodeEnum for $name {
            const VALUES: &'static [Self] = &[ $( Self::$variant, )* ];
            const TYPE_NAME: &'static str = concat!(module_path!(), "::", stringify!($name));
        }
    };
}
