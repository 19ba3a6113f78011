//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::{Command, RaceArgs, ServeArgs};
pub use types::{HttpMethod, OutputFormat, PositiveUsize};

pub(crate) use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT};
pub(crate) use parsers::{parse_cookie, parse_header};
