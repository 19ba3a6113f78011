//! Configuration loading and application.
mod apply;
mod loader;
pub mod types;


pub use apply::apply_cli_overrides;
pub use loader::{load_config, load_config_file};
pub use types::{DEFAULT_COUNT, DEFAULT_REQUEST_TIMEOUT_SECS, RaceConfig, TargetSpec};
