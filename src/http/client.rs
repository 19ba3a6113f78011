use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Proxy, Url, redirect};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};
use crate::race::PreparedTarget;

/// Builds the client shared by every execution of one target.
///
/// Certificate and hostname checks are off since targets are frequently
/// staging hosts behind self-signed certificates. Redirects are only
/// followed when the target asks for it; otherwise the 3xx response itself
/// is the outcome.
///
/// # Errors
///
/// Returns an error when the proxy is rejected or the TLS backend cannot be
/// initialised.
pub fn build_target_client(
    target: &PreparedTarget,
    proxy: Option<&Url>,
    timeout: Duration,
) -> AppResult<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .cookie_provider(Arc::clone(&target.cookie_store));

    builder = if target.spec.redirects {
        builder.redirect(redirect::Policy::default())
    } else {
        builder.redirect(redirect::Policy::none())
    };

    builder = match proxy {
        Some(proxy_url) => {
            let rule = Proxy::all(proxy_url.as_str()).map_err(|source| {
                AppError::http(HttpError::ProxyRejected {
                    url: proxy_url.to_string(),
                    source,
                })
            })?;
            builder.proxy(rule)
        }
        None => builder.no_proxy(),
    };

    builder.build().map_err(|source| {
        AppError::http(HttpError::BuildClientFailed {
            url: target.spec.url.clone(),
            source,
        })
    })
}
