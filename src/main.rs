//! Startup check for the error-code registry.
//!
//! Scans the configured discovery roots, reports duplicate codes and
//! namespace collisions, and prints every registered code grouped by its
//! declaring type. A malformed code name fails the run.
//!
//! Optional environment variables:
//! - ERROR_CODE_ROOTS (defaults to service_commons)
//! - DEFAULT_LOCALE (defaults to en)
//! - RUST_LOG

use anyhow::{Context, Result};
use service_commons::config::Config;
use service_commons::error_code::{CommonErrorCode, SharedRegistry, StaticDiscovery};
use service_commons::i18n::LocaleResolver;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("service_commons=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let resolver = LocaleResolver::from_config(&config);
    info!(
        roots = ?config.error_code_roots,
        locale = %resolver.default_locale(),
        "Scanning error codes"
    );

    let discovery = StaticDiscovery::new().register::<CommonErrorCode>();
    let registry = SharedRegistry::default();
    let snapshot = registry
        .rescan(&config.error_code_roots, &discovery)
        .context("Error code registry failed to build")?;

    for diagnostic in snapshot.diagnostics() {
        warn!("{}", diagnostic);
    }

    for (type_name, codes) in snapshot.by_type() {
        println!("{}", type_name);
        for entry in codes {
            println!(
                "  {:>10}  {:<12}  {}  ({})",
                entry.code,
                entry.name(),
                entry.default_message(),
                entry.local_message()
            );
        }
    }

    info!(
        codes = snapshot.len(),
        diagnostics = snapshot.diagnostics().len(),
        "Error code registry ready"
    );
    Ok(())
}
