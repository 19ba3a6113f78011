use super::*;
use crate::args::HttpMethod;
use crate::config::{RaceConfig, TargetSpec};
use crate::http::{ResponseHead, ResponseRecord};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;


fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn head(status_code: u16, content_length: Option<u64>) -> ResponseHead {
    ResponseHead {
        status_code,
        protocol: "HTTP/1.1".to_owned(),
        headers: BTreeMap::new(),
        content_length,
        location: None,
    }
}

fn record(index: usize, origin: &Arc<TargetSpec>, status: u16, body: &str) -> ResponseRecord {
    let length = u64::try_from(body.len()).ok();
    ResponseRecord::completed(index, Arc::clone(origin), head(status, length), body)
}
