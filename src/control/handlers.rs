use ::http::StatusCode;
use tracing::{Level, info, warn};

use crate::config::RaceConfig;
use crate::race::{prepare_attack, run_race_test};
use crate::report::{RaceReport, build_report};

use super::http::ControlRequest;
use super::state::ConfigStore;

const SAVED: &str = "configuration saved";

/// What a routed request answers with.
#[derive(Debug)]
pub(super) enum Reply {
    Message(StatusCode, String),
    Config(Box<RaceConfig>),
    Report(Box<RaceReport>),
}

impl Reply {
    fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Message(status, message.into())
    }
}

pub(super) async fn route(request: &ControlRequest, store: &ConfigStore) -> Reply {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/set/config") => set_config(&request.body, store).await,
        ("GET", "/get/config") => match store.get().await {
            Some(config) => Reply::Config(Box::new(config)),
            None => Reply::message(StatusCode::BAD_REQUEST, "no configuration set"),
        },
        ("POST", "/start") => start(store).await,
        _ => Reply::message(StatusCode::NOT_FOUND, "not found"),
    }
}

async fn set_config(body: &[u8], store: &ConfigStore) -> Reply {
    let Ok(mut config) = serde_json::from_slice::<RaceConfig>(body) else {
        return Reply::message(StatusCode::BAD_REQUEST, "invalid JSON data");
    };
    config.apply_defaults();
    if let Err(err) = prepare_attack(&config) {
        return Reply::message(StatusCode::BAD_REQUEST, err.to_string());
    }
    info!(
        "Configuration saved ({} targets, count {})",
        config.targets.len(),
        config.count
    );
    let message = saved_message(&config, tracing::enabled!(Level::DEBUG));
    store.set(config).await;
    Reply::message(StatusCode::OK, message)
}

/// The log filter is fixed when the server starts, so a stored `verbose`
/// only shows diagnostics if debug output was already enabled.
pub(super) fn saved_message(config: &RaceConfig, debug_enabled: bool) -> String {
    if config.verbose && !debug_enabled {
        warn!("Stored configuration is verbose but debug logging is off");
        format!(
            "{}; verbose diagnostics need `serve --verbose` or RACE_LOG=debug",
            SAVED
        )
    } else {
        SAVED.to_owned()
    }
}

async fn start(store: &ConfigStore) -> Reply {
    let Some(config) = store.get().await else {
        return Reply::message(StatusCode::BAD_REQUEST, "no configuration set");
    };
    match run_race_test(&config).await {
        Ok(outcome) => {
            for err in &outcome.errors {
                warn!("{}", err);
            }
            Reply::Report(Box::new(build_report(&outcome)))
        }
        Err(err) => Reply::message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("error: {}", err),
        ),
    }
}
