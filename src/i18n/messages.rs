//! Message lookup keyed by (locale, key).
//!
//! [`MessageSource`] is the seam to wherever bundles actually live. The free
//! functions in this module never fail: a missing message is logged and the
//! raw key is returned, so a translation gap never turns into an error
//! response.

use crate::i18n::format::{format_indexed, replace_named, VAR_PREFIX, VAR_SUFFIX};
use crate::i18n::locale::LocaleCode;
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

/// Errors from message lookup.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("No message found for key '{key}' in locale '{locale}'")]
    MessageNotFound { locale: String, key: String },

    #[error("Invalid message bundle for locale '{locale}': {source}")]
    InvalidBundle {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of raw message templates.
pub trait MessageSource: Send + Sync {
    /// Template for `key` in `locale`, before argument substitution.
    fn template(&self, locale: &str, key: &str) -> Result<String, I18nError>;

    /// Template for `key` in `locale` with `{0}`-style arguments filled in.
    fn lookup(&self, locale: &str, key: &str, args: &[&dyn Display]) -> Result<String, I18nError> {
        let template = self.template(locale, key)?;
        if args.is_empty() {
            Ok(template)
        } else {
            Ok(format_indexed(&template, args))
        }
    }
}

/// In-memory bundles, one map of templates per locale.
///
/// Lookup falls back from the full locale (`zh_hk`) to its language (`zh`),
/// then to the configured fallback locale, then to the base bundle.
#[derive(Debug, Clone, Default)]
pub struct StaticMessageSource {
    bundles: HashMap<String, HashMap<String, String>>,
    fallback_locale: Option<LocaleCode>,
}

/// Bundle key of the locale-independent base bundle.
const BASE_BUNDLE: &str = "";

impl StaticMessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one template. An empty `locale` targets the base bundle.
    pub fn with_message(mut self, locale: &str, key: &str, template: &str) -> Self {
        self.bundle_mut(locale)
            .insert(key.to_string(), template.to_string());
        self
    }

    /// Add every `(key, template)` pair to the bundle for `locale`.
    pub fn with_bundle<I, K, V>(mut self, locale: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let bundle = self.bundle_mut(locale);
        for (key, template) in messages {
            bundle.insert(key.into(), template.into());
        }
        self
    }

    /// Parse a flat JSON object of `key -> template` into the bundle for `locale`.
    pub fn with_json_bundle(self, locale: &str, json: &str) -> Result<Self, I18nError> {
        let messages: HashMap<String, String> =
            serde_json::from_str(json).map_err(|source| I18nError::InvalidBundle {
                locale: locale.to_string(),
                source,
            })?;
        Ok(self.with_bundle(locale, messages))
    }

    /// Locale consulted after the requested one and before the base bundle.
    pub fn with_fallback_locale(mut self, locale: &str) -> Self {
        self.fallback_locale = LocaleCode::parse(locale);
        self
    }

    fn bundle_mut(&mut self, locale: &str) -> &mut HashMap<String, String> {
        let key = LocaleCode::parse(locale)
            .map(|code| code.as_str().to_string())
            .unwrap_or_default();
        self.bundles.entry(key).or_default()
    }

    fn candidates(&self, locale: &str) -> Vec<String> {
        let mut chain = Vec::with_capacity(5);
        let mut push = |code: &LocaleCode| {
            for key in [code.as_str(), code.language()] {
                if !chain.iter().any(|existing: &String| existing == key) {
                    chain.push(key.to_string());
                }
            }
        };
        if let Some(code) = LocaleCode::parse(locale) {
            push(&code);
        }
        if let Some(fallback) = &self.fallback_locale {
            push(fallback);
        }
        chain.push(BASE_BUNDLE.to_string());
        chain
    }
}

impl MessageSource for StaticMessageSource {
    fn template(&self, locale: &str, key: &str) -> Result<String, I18nError> {
        self.candidates(locale)
            .iter()
            .filter_map(|bundle| self.bundles.get(bundle))
            .find_map(|bundle| bundle.get(key))
            .cloned()
            .ok_or_else(|| I18nError::MessageNotFound {
                locale: locale.to_string(),
                key: key.to_string(),
            })
    }
}

/// Look up `key` in `locale`, returning the key itself when no message exists.
pub fn message(source: &dyn MessageSource, locale: &str, key: &str, args: &[&dyn Display]) -> String {
    match source.lookup(locale, key, args) {
        Ok(message) => message,
        Err(e) => {
            error!(locale, key, "Message lookup failed: {}", e);
            key.to_string()
        }
    }
}

/// Look up `key` in `locale` and substitute `{name}` variables from `values`.
///
/// Returns the key itself when no message exists.
pub fn message_named(
    source: &dyn MessageSource,
    locale: &str,
    key: &str,
    values: &HashMap<&str, String>,
) -> String {
    match source.template(locale, key) {
        Ok(template) if values.is_empty() => template,
        Ok(template) => replace_named(&template, values, VAR_PREFIX, VAR_SUFFIX),
        Err(e) => {
            error!(locale, key, "Message lookup failed: {}", e);
            key.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StaticMessageSource {
        StaticMessageSource::new()
            .with_message("", "greeting", "Hello {0}")
            .with_message("zh_HK", "greeting", "你好 {0}")
            .with_message("zh", "farewell", "再見")
            .with_message("fr", "greeting", "Bonjour {0}")
            .with_message("en", "only_en", "English only")
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_exact_locale_lookup() {
        let msg = source().lookup("zh-hk", "greeting", &[&"Ann"]).unwrap();
        assert_eq!(msg, "你好 Ann");
    }

    #[test]
    fn test_language_fallback() {
        let msg = source().lookup("fr_CA", "greeting", &[&"Ann"]).unwrap();
        assert_eq!(msg, "Bonjour Ann");
        assert_eq!(source().template("zh_tw", "farewell").unwrap(), "再見");
    }

    #[test]
    fn test_base_bundle_fallback() {
        let msg = source().lookup("de", "greeting", &[&"Ann"]).unwrap();
        assert_eq!(msg, "Hello Ann");
    }

    #[test]
    fn test_configured_fallback_locale() {
        let src = source().with_fallback_locale("en_US");
        assert_eq!(src.template("de", "only_en").unwrap(), "English only");
        assert!(source().template("de", "only_en").is_err());
    }

    #[test]
    fn test_missing_key_is_message_not_found() {
        let err = source().lookup("en", "nope", &[]).unwrap_err();
        assert!(matches!(err, I18nError::MessageNotFound { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_json_bundle() {
        let src = StaticMessageSource::new()
            .with_json_bundle("es", r#"{"greeting": "Hola {0}"}"#)
            .unwrap();
        assert_eq!(src.lookup("es_MX", "greeting", &[&"Ana"]).unwrap(), "Hola Ana");
    }

    #[test]
    fn test_invalid_json_bundle() {
        let err = StaticMessageSource::new()
            .with_json_bundle("es", "[1, 2]")
            .unwrap_err();
        assert!(matches!(err, I18nError::InvalidBundle { .. }));
    }

    // ==================== Facade Tests ====================

    #[test]
    fn test_message_returns_key_when_missing() {
        assert_eq!(message(&source(), "en", "missing.key", &[]), "missing.key");
    }

    #[test]
    fn test_message_named() {
        let src = StaticMessageSource::new().with_message("en", "limit", "Max = {max}");
        let values = HashMap::from([("max", "1MB".to_string())]);
        assert_eq!(message_named(&src, "en", "limit", &values), "Max = 1MB");
        assert_eq!(message_named(&src, "en", "other", &values), "other");
    }
}
