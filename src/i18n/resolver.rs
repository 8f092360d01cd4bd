//! Request locale resolution.
//!
//! The locale of a request comes from, in order: an explicit override set
//! while handling the request, the configured locale header (`x-locale` by
//! default), `x-accept-language`, the first entry of `Accept-Language`, and
//! finally the configured default locale.

use crate::config::Config;
use crate::i18n::locale::{is_traditional_chinese, normalize, ZH};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::HeaderMap;
use tracing::debug;

pub const DEFAULT_LOCALE_HEADER: &str = "x-locale";
pub const CUSTOM_LANGUAGE_HEADER: &str = "x-accept-language";

/// Supplies the current requester's locale code.
pub trait LocaleSource {
    fn current_locale(&self) -> String;
}

/// A locale source that always answers with the same code.
///
/// Useful outside a request, e.g. in scheduled jobs.
#[derive(Debug, Clone)]
pub struct FixedLocale(pub String);

impl LocaleSource for FixedLocale {
    fn current_locale(&self) -> String {
        normalize(&self.0)
    }
}

/// Rewrites a locale code taken from a request before it is used.
pub trait LocaleCustomizer: Send + Sync {
    fn customize(&self, locale: &str) -> String;
}

/// Collapses request locales onto the small set an app actually ships.
///
/// - Codes on the allow-list pass through unchanged.
/// - `zh_CN` stays `zh_CN`; traditional Chinese becomes `zh_HK`; any other
///   Chinese becomes `zh_CN`.
/// - Everything else keeps only its language part, replaced by the first
///   allowed code when that language is not allowed.
#[derive(Debug, Clone, Default)]
pub struct SimpleLocaleCustomizer {
    allowed: Vec<String>,
}

impl SimpleLocaleCustomizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    fn is_allowed(&self, locale: &str) -> bool {
        self.allowed.iter().any(|a| a.eq_ignore_ascii_case(locale))
    }
}

impl LocaleCustomizer for SimpleLocaleCustomizer {
    fn customize(&self, locale: &str) -> String {
        let locale = locale.trim().replace('-', "_");
        if self.is_allowed(&locale) {
            return locale;
        }

        let lower = locale.to_lowercase();
        if lower == "zh_cn" {
            return "zh_CN".to_string();
        }
        if is_traditional_chinese(&lower) {
            return "zh_HK".to_string();
        }
        if lower.starts_with(ZH) {
            return "zh_CN".to_string();
        }

        let language = match locale.find('_') {
            Some(idx) if idx > 0 => &locale[..idx],
            _ => locale.as_str(),
        };
        match self.allowed.first() {
            Some(first) if !self.is_allowed(language) => first.clone(),
            _ => language.to_string(),
        }
    }
}

/// Resolves the locale of a request from its headers.
pub struct LocaleResolver {
    locale_header: String,
    default_locale: String,
    customizers: Vec<Box<dyn LocaleCustomizer>>,
}

impl LocaleResolver {
    pub fn new(default_locale: &str) -> Self {
        Self {
            locale_header: DEFAULT_LOCALE_HEADER.to_string(),
            default_locale: normalize(default_locale),
            customizers: Vec::new(),
        }
    }

    /// Resolver configured from [`Config`]; installs a
    /// [`SimpleLocaleCustomizer`] when an allow-list is configured.
    pub fn from_config(config: &Config) -> Self {
        let resolver = Self::new(&config.default_locale).with_header(&config.locale_header);
        if config.allowed_locales.is_empty() {
            resolver
        } else {
            resolver.with_customizer(SimpleLocaleCustomizer::with_allowed(
                config.allowed_locales.iter().cloned(),
            ))
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.locale_header = header.to_lowercase();
        self
    }

    /// Customizers run in the order they were added.
    pub fn with_customizer(mut self, customizer: impl LocaleCustomizer + 'static) -> Self {
        self.customizers.push(Box::new(customizer));
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Apply the customizers to `locale` and normalize the result.
    pub fn locale_code_in_app(&self, locale: &str) -> String {
        let customized = self
            .customizers
            .iter()
            .fold(locale.to_string(), |code, c| c.customize(&code));
        normalize(&customized)
    }

    /// Resolve the normalized locale code for a request.
    pub fn resolve(&self, headers: &HeaderMap) -> String {
        for name in [self.locale_header.as_str(), CUSTOM_LANGUAGE_HEADER] {
            if let Some(value) = header_value(headers, name) {
                return self.locale_code_in_app(value);
            }
        }

        if let Some(accept) = header_value(headers, ACCEPT_LANGUAGE.as_str()) {
            // Accept-Language: zh-CN,zh;q=0.9,en;q=0.8 -> only the first entry counts
            debug!(accept_language = accept, "Resolving locale from browser language");
            let first = accept
                .split(',')
                .next()
                .and_then(|entry| entry.split(';').next())
                .map(str::trim)
                .unwrap_or_default();
            if !first.is_empty() {
                return self.locale_code_in_app(first);
            }
        }

        self.default_locale.clone()
    }

    /// Locale source bound to one request.
    pub fn for_request<'a>(&'a self, headers: &'a HeaderMap) -> RequestLocale<'a> {
        RequestLocale {
            resolver: self,
            headers,
            override_locale: None,
        }
    }
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// The locale of a single request, with an optional in-request override.
pub struct RequestLocale<'a> {
    resolver: &'a LocaleResolver,
    headers: &'a HeaderMap,
    override_locale: Option<String>,
}

impl RequestLocale<'_> {
    /// Pin the locale for the rest of the request.
    ///
    /// The code is normalized (lowercase, `_` separator) but skips the
    /// resolver's customizers.
    pub fn set_locale(&mut self, locale: &str) {
        self.override_locale = Some(normalize(locale)).filter(|l| !l.is_empty());
    }

    pub fn clear_locale(&mut self) {
        self.override_locale = None;
    }
}

impl LocaleSource for RequestLocale<'_> {
    fn current_locale(&self) -> String {
        match &self.override_locale {
            Some(locale) => locale.clone(),
            None => self.resolver.resolve(self.headers),
        }
    }
}
