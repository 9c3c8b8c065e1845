//! CLI utilities for binaries
//!
//! Handles settings path resolution from arguments and environment
//! variables.

use std::path::PathBuf;

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "WS_LISTENER_CONFIG";

/// Settings file used when neither an argument nor the environment names one
pub const DEFAULT_CONFIG_PATH: &str = "config/ws_listener.yaml";

/// Load the settings path from environment or use default
///
/// # Examples
/// ```
/// use ws_listener::bin_common::load_config_from_env;
///
/// let path = load_config_from_env();
/// ```
pub fn load_config_from_env() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

/// Settings path for the listener binary
///
/// The first positional argument wins, then the environment, then the
/// default path.
pub fn resolve_config_path(args: &[String]) -> PathBuf {
    match args.first() {
        Some(path) => PathBuf::from(path),
        None => load_config_from_env(),
    }
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
