use reqwest::{Client, Request, Url};

use crate::race::PreparedTarget;

/// Materialises a fresh request for one execution. The body is rebuilt from
/// the target every time so no execution observes another's consumed stream.
pub(crate) fn build_request(
    client: &Client,
    target: &PreparedTarget,
    url: Url,
) -> Result<Request, reqwest::Error> {
    let mut builder = client
        .request(target.spec.method.as_reqwest(), url)
        .headers(target.headers.clone());
    if !target.spec.body.is_empty() {
        builder = builder.body(target.spec.body.clone());
    }
    builder.build()
}
