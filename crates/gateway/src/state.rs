//! Application state
//!
//! The state shared across request handlers: the loaded configuration and
//! the platform collaborator clients. All of it is cheap to clone; the
//! platform clients share one pooled HTTP client and hold no per-caller
//! authentication state.

use std::sync::Arc;

use chatflow_common::{AppConfig, Platform, Result};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub platform: Platform,
}

/// Build the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> Result<AppState> {
    let platform = Platform::new(&config.platform)?;

    Ok(AppState {
        config: Arc::new(config),
        platform,
    })
}
