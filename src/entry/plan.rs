use std::io::Write;

use tracing::info;

use crate::args::{Command, OutputFormat, RaceArgs, ServeArgs};
use crate::config::{RaceConfig, apply_cli_overrides, load_config};
use crate::control::{ConfigStore, serve};
use crate::error::{AppError, AppResult, ValidationError};
use crate::race::run_race_test;
use crate::report::{build_report, print_runtime_errors, render_json, write_text};

pub(super) enum RunPlan {
    Local {
        config: RaceConfig,
        output: OutputFormat,
        no_color: bool,
    },
    Serve {
        args: ServeArgs,
        config: Option<RaceConfig>,
    },
}

impl RunPlan {
    pub(super) const fn verbose(&self) -> bool {
        match self {
            Self::Local { config, .. } => config.verbose,
            Self::Serve { args, config } => {
                args.verbose || matches!(config, Some(RaceConfig { verbose: true, .. }))
            }
        }
    }

    pub(super) const fn no_color(&self) -> bool {
        match self {
            Self::Local { no_color, .. } => *no_color,
            Self::Serve { args, .. } => args.no_color,
        }
    }
}

/// Loads configuration and decides what this invocation does.
pub(super) fn build_plan(mut args: RaceArgs) -> AppResult<RunPlan> {
    if let Some(Command::Serve(serve_args)) = args.command.take() {
        let mut config = load_config(serve_args.config.as_deref())?;
        if let Some(config) = config.as_mut() {
            config.apply_defaults();
        }
        return Ok(RunPlan::Serve {
            args: serve_args,
            config,
        });
    }

    let Some(mut config) = load_config(args.config.as_deref())? else {
        return Err(AppError::validation(ValidationError::MissingConfig));
    };
    apply_cli_overrides(&mut config, &args);
    Ok(RunPlan::Local {
        config,
        output: args.output,
        no_color: args.no_color,
    })
}

pub(super) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Local { config, output, .. } => run_local(&config, output).await,
        RunPlan::Serve { args, config } => {
            if config.is_some() {
                info!("Control server preloaded with configuration.");
            }
            serve(&args.listen, ConfigStore::new(config), args.auth_token).await
        }
    }
}

async fn run_local(config: &RaceConfig, output: OutputFormat) -> AppResult<()> {
    let outcome = run_race_test(config).await?;
    let report = build_report(&outcome);
    print_runtime_errors(&report.errors);
    match output {
        OutputFormat::Text => {
            let mut stdout = std::io::stdout().lock();
            write_text(&mut stdout, &report)?;
            stdout.flush()?;
        }
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }
    Ok(())
}
