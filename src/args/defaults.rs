pub(crate) const DEFAULT_USER_AGENT: &str = concat!("race-the-web/", env!("CARGO_PKG_VERSION"));

/// Config files picked up from the working directory when no path is given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["race.toml", "race.json"];

pub(crate) const DEFAULT_CONTROL_LISTEN: &str = "127.0.0.1:8000";
