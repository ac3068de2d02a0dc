//! CLI configuration: thin wrapper around `feedwatch_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--seed, --dataset, --no-latency).

use feedwatch_core::{ApiConfig, LatencyProfile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use feedwatch_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load the config file, treating a missing file as defaults but surfacing
/// parse and validation errors.
pub fn resolve_config() -> Result<Config, CliError> {
    Ok(load_config()?)
}

/// Translate config + global flags into the facade configuration.
///
/// CLI flag overrides take priority over config values.
pub fn resolve_api_config(cfg: &Config, global: &GlobalOpts) -> ApiConfig {
    let mut api = cfg.to_runtime().api;
    if let Some(seed) = global.seed {
        api.seed = Some(seed);
    }
    if let Some(dataset) = global.dataset {
        api.dataset = dataset;
    }
    if global.no_latency {
        api.latency = LatencyProfile::instant();
    }
    api
}
