//! Request/response control surface: store a configuration, read it back,
//! and start a run, over a small HTTP/1.1 listener.
mod handlers;
mod http;
mod state;


use ::http::StatusCode;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ControlError};

use handlers::{Reply, route};
use self::http::{Refusal, read_request, write_json, write_message};

pub use state::ConfigStore;

/// Binds `listen` and serves control requests until the process exits.
///
/// # Errors
///
/// Returns an error when the listener cannot be bound.
pub async fn serve(listen: &str, store: ConfigStore, auth_token: Option<String>) -> AppResult<()> {
    let listener = TcpListener::bind(listen).await.map_err(|source| {
        AppError::control(ControlError::Bind {
            addr: listen.to_owned(),
            source,
        })
    })?;
    info!("Control server listening on {}", listen);
    accept_connections(listener, store, auth_token).await;
    Ok(())
}

pub(crate) async fn accept_connections(
    listener: TcpListener,
    store: ConfigStore,
    auth_token: Option<String>,
) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(result) => result,
            Err(err) => {
                warn!("Failed to accept control connection: {}", err);
                continue;
            }
        };
        debug!("Control connection from {}", peer);
        let store = store.clone();
        let auth_token = auth_token.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(socket, auth_token.as_deref(), &store).await {
                debug!("Control connection closed early: {}", err);
            }
        });
    }
}

async fn handle_connection(
    mut socket: TcpStream,
    auth_token: Option<&str>,
    store: &ConfigStore,
) -> AppResult<()> {
    let request = match read_request(&mut socket).await {
        Ok(request) => request,
        Err(refusal) => return refuse(&mut socket, refusal).await,
    };
    if auth_token.is_some_and(|token| !request.bears_token(token)) {
        return refuse(&mut socket, Refusal::Unauthorized).await;
    }

    debug!("{} {}", request.method, request.path);
    match route(&request, store).await {
        Reply::Message(status, message) => write_message(&mut socket, status, &message).await,
        Reply::Config(config) => write_json(&mut socket, StatusCode::OK, &*config).await,
        Reply::Report(report) => write_json(&mut socket, StatusCode::OK, &*report).await,
    }
}

async fn refuse(socket: &mut TcpStream, refusal: Refusal) -> AppResult<()> {
    debug!("Refused control request: {}", refusal.message());
    write_message(socket, refusal.status(), refusal.message()).await
}
