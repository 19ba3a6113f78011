mod plan;

use std::ffi::OsString;
use std::path::Path;

use clap::{CommandFactory, FromArgMatches};

use crate::args::{DEFAULT_CONFIG_FILES, RaceArgs};
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

/// Parses the command line, then runs a race test or the control server.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, or the run
/// fails before any request is sent.
pub fn run() -> AppResult<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let plan = build_plan(args)?;
    crate::system::logger::init_logging(plan.verbose(), plan.no_color());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute_plan(plan))
}

fn parse_args() -> AppResult<Option<RaceArgs>> {
    let mut cmd = RaceArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RaceArgs::from_arg_matches(&matches)?;

    Ok(Some(args))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}
