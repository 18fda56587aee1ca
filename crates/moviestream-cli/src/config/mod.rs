//! Application configuration module.
//!
//! Manages the TOML config file holding the TMDB key, browser
//! debounce, player embed base, and contact relay credentials.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ContactConfig, TMDB_API_KEY_ENV, TmdbConfig};
pub use paths::{resolve_config_path, resolve_log_path};
