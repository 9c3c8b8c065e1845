//! WebSocket Listener - Main Library
//!
//! This crate wires the `wslisten` library into a runnable binary.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, settings,
//!   example observer, runner)
//! - **wslisten**: Connection-resilience library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use ws_listener::bin_common::{load_config_from_env, ListenerSettings};
//! use ws_listener::wslisten::ConnectionManager;
//! ```

// Re-export workspace libraries for convenience
pub use wslisten;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod observer;
    pub mod runner;
    pub mod settings;

    pub use cli::{
        load_config_from_env, parse_args, resolve_config_path, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH,
    };
    pub use observer::PrintObserver;
    pub use runner::{init_logging_with_level, BinaryRunner, RunConfig};
    pub use settings::{ListenerSettings, SettingsError, DEFAULT_URL};
}
