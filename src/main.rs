use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use solar_expert::config::{Config, ConfigError};
use solar_expert::models::location::{LocationError, LocationTable};
use solar_expert::routes::quote_routes::app_router;
use solar_expert::shared_state::AppState;

const CONFIG_ENV: &str = "SOLAR_EXPERT_CONFIG";

fn init_tracing() {
    let default_level = if cfg!(feature = "verbose_log") { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("built-in location table: {0}")]
    Locations(#[from] LocationError),
}

/// Loads and validates everything the server needs before it binds.
fn bootstrap(config_path: &str) -> Result<AppState, StartupError> {
    // 1. Load configuration
    let config = Config::load_or_default(config_path)?;
    tracing::info!(
        capacity_basis = ?config.engine.capacity_basis,
        tax_deduction_years = config.engine.tax_deduction_years,
        "configuration loaded"
    );

    // 2. Shared, read-only state
    let locations = LocationTable::colombia()?;
    tracing::info!(locations = locations.len(), "location table ready");
    Ok(AppState::new(config, locations))
}

#[tokio::main]
async fn main() {
    init_tracing();

    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.json".to_string());
    let state = match bootstrap(&path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    // 3. HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server.port));
    let app = app_router(state);
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bootstrap_with_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let state = bootstrap(path.to_str().unwrap()).unwrap();
        assert_eq!(state.locations.len(), 32);
        assert_eq!(state.config.server.port, 8080);
    }

    #[test]
    fn test_bootstrap_rejects_malformed_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = bootstrap(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Parse { .. })));
    }
}
