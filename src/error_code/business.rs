//! The error raised by business logic, carrying a numeric error code.

use crate::error_code::{CommonErrorCode, ErrorCode};
use crate::i18n::{format_positional, message, MessageSource};
use std::error::Error as StdError;
use std::fmt::Display;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A business failure reported to the client with `code` and `message`.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct BusinessError {
    code: u64,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl BusinessError {
    /// Error with the generic bad-request code (400).
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_code(message, CommonErrorCode::E0000000400.code())
    }

    pub fn with_code(message: impl Into<String>, code: u64) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> u64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error carries the given error code.
    pub fn is(&self, error_code: &dyn ErrorCode) -> bool {
        self.code == error_code.code()
    }
}

/// The default message of `error_code` with `{}` placeholders filled in order.
pub fn format_message(error_code: &dyn ErrorCode, args: &[&dyn Display]) -> String {
    format_positional(error_code.default_message(), args)
}

/// Raise `error_code` with its formatted default message.
pub fn exception_and_format(error_code: &dyn ErrorCode, args: &[&dyn Display]) -> BusinessError {
    BusinessError::with_code(format_message(error_code, args), error_code.code())
}

/// Raise `error_code` with a localized message.
///
/// The default message is used as the i18n key; when the key has no
/// translation the key itself becomes the message.
pub fn i18n_exception(
    error_code: &dyn ErrorCode,
    messages: &dyn MessageSource,
    locale: &str,
    args: &[&dyn Display],
) -> BusinessError {
    let text = message(messages, locale, error_code.default_message(), args);
    BusinessError::with_code(text, error_code.code())
}
