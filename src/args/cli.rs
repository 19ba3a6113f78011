use clap::{Args, Parser, Subcommand};

use super::defaults::DEFAULT_CONTROL_LISTEN;
use super::parsers::parse_positive_usize;
use super::types::{OutputFormat, PositiveUsize};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the control API (set config, get config, start a run)
    Serve(ServeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address the control API listens on
    #[arg(long, default_value = DEFAULT_CONTROL_LISTEN)]
    pub listen: String,

    /// Preload the control API with this configuration file (.toml or .json)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Require `Authorization: Bearer <token>` on every control request
    #[arg(long = "auth-token", env = "RACE_CONTROL_TOKEN")]
    pub auth_token: Option<String>,

    /// Enable verbose diagnostics
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Race condition tester for web applications - fires a burst of near-simultaneous requests and groups the responses into unique outcomes.",
    args_conflicts_with_subcommands = true
)]
pub struct RaceArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the configuration file (.toml or .json); defaults to race.toml
    #[arg(value_name = "CONFIG")]
    pub config: Option<String>,

    /// Requests per target (overrides the config file)
    #[arg(long, short = 'n', value_parser = parse_positive_usize)]
    pub count: Option<PositiveUsize>,

    /// HTTP/HTTPS proxy for every request (overrides the config file)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Enable verbose diagnostics
    #[arg(long, short)]
    pub verbose: bool,

    /// Report format printed after the run
    #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
