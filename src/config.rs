use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Locale
    pub default_locale: String,
    pub locale_header: String,
    pub allowed_locales: Vec<String>,

    // Error codes
    pub error_code_roots: Vec<String>,

    // Environment
    pub app_env: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Locale
            default_locale: std::env::var("DEFAULT_LOCALE")
                .unwrap_or_else(|_| "en".to_string()),
            locale_header: std::env::var("LOCALE_HEADER")
                .unwrap_or_else(|_| "x-locale".to_string()),
            allowed_locales: std::env::var("ALLOWED_LOCALES")
                .map(|v| split_list(&v))
                .unwrap_or_default(),

            // Error codes (comma-separated module roots)
            error_code_roots: std::env::var("ERROR_CODE_ROOTS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec!["service_commons".to_string()]),

            // Environment
            app_env: std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string()),
        };

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Stack traces and error chains are only exposed outside production.
    pub fn is_prod(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("prod") || self.app_env.eq_ignore_ascii_case("production")
    }

    fn validate(&self) -> Result<()> {
        if self.default_locale.trim().is_empty() {
            bail!("DEFAULT_LOCALE must not be blank");
        }
        if self.locale_header.trim().is_empty() {
            bail!("LOCALE_HEADER must not be blank");
        }
        axum::http::HeaderName::from_bytes(self.locale_header.trim().as_bytes())
            .with_context(|| format!("LOCALE_HEADER '{}' is not a valid header name", self.locale_header))?;
        if self.error_code_roots.is_empty() {
            bail!("ERROR_CODE_ROOTS must name at least one root");
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
