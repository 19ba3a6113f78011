//! Request construction, concurrent dispatch, and response capture.
mod client;
mod dispatch;
mod request;
mod response;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::build_target_client;
pub use dispatch::{Dispatched, dispatch};
pub use response::{ExecutionOutcome, ResponseHead, ResponseRecord, body_text};
