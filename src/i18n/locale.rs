//! Locale codes: normalization and the coarse "fuzzy" locale form.
//!
//! Every locale string that enters the crate goes through [`normalize`]
//! before it is compared: lowercase, with `-` replaced by `_`. Chinese is the
//! one language where the region matters, because it selects the script.

use std::fmt;

pub const ZH: &str = "zh";
pub const ZH_HK: &str = "zh_hk";
pub const ZH_CN: &str = "zh_cn";
pub const ZH_TW: &str = "zh_tw";
pub const ZH_MO: &str = "zh_mo";
pub const ZH_HANT: &str = "zh_hant";

/// Locale codes treated as traditional-script Chinese.
///
/// Any other code starting with `zh` is treated as simplified Chinese.
pub const TRADITIONAL_CHINESE_LOCALES: [&str; 5] = [ZH, ZH_HK, ZH_TW, ZH_MO, ZH_HANT];

/// Lowercase a locale string and normalize the region separator to `_`.
pub fn normalize(locale: &str) -> String {
    locale.trim().to_lowercase().replace('-', "_")
}

/// First two characters of a (normalized) locale code.
///
/// Shorter codes are returned whole.
pub fn language_prefix(locale: &str) -> &str {
    match locale.char_indices().nth(2) {
        Some((idx, _)) => &locale[..idx],
        None => locale,
    }
}

/// Whether a normalized code belongs to the traditional Chinese set.
pub fn is_traditional_chinese(locale: &str) -> bool {
    TRADITIONAL_CHINESE_LOCALES.contains(&locale)
}

/// Whether a normalized code is Chinese of any script.
pub fn is_chinese(locale: &str) -> bool {
    locale.starts_with(ZH)
}

/// Map a locale code to its coarse matching form.
///
/// Non-Chinese codes collapse to their two-letter language prefix. Chinese
/// collapses to `zh_hk` (traditional) or `zh_cn` (simplified).
///
/// # Example
/// ```
/// use service_commons::i18n::parse_to_fuzzy_locale;
///
/// assert_eq!(parse_to_fuzzy_locale("zh-Hant"), "zh_hk");
/// assert_eq!(parse_to_fuzzy_locale("en_US"), "en");
/// ```
pub fn parse_to_fuzzy_locale(locale: &str) -> String {
    let normalized = normalize(locale);
    let prefix = language_prefix(&normalized);
    if prefix == ZH {
        if is_traditional_chinese(&normalized) {
            ZH_HK.to_string()
        } else {
            ZH_CN.to_string()
        }
    } else {
        prefix.to_string()
    }
}

/// A normalized locale code such as `en`, `en_us` or `zh_hk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Normalize `code` into a `LocaleCode`.
    ///
    /// Returns `None` for blank input.
    pub fn parse(code: &str) -> Option<LocaleCode> {
        let normalized = normalize(code);
        if normalized.is_empty() {
            None
        } else {
            Some(LocaleCode(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language part, i.e. everything before the first `_`.
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Region part, if any (`us` for `en_us`).
    pub fn region(&self) -> Option<&str> {
        self.0.split_once('_').map(|(_, region)| region)
    }

    /// Two-character language prefix used by the fuzzy matcher.
    pub fn prefix(&self) -> &str {
        language_prefix(&self.0)
    }

    pub fn is_chinese(&self) -> bool {
        is_chinese(&self.0)
    }

    pub fn is_traditional_chinese(&self) -> bool {
        is_traditional_chinese(&self.0)
    }

    /// Coarse matching form, see [`parse_to_fuzzy_locale`].
    pub fn fuzzy(&self) -> LocaleCode {
        LocaleCode(parse_to_fuzzy_locale(&self.0))
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
