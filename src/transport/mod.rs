//! HTTP plumbing shared by the admin API and the application API client.
//!
//! - [`RestTransport`] performs admin API calls ([`AdminRequest`])
//! - [`RawResponse`] is a fully buffered response
//! - [`PreparedRequest`] is a final outgoing request that renders as curl

mod prepared;
mod response;
mod rest;

pub use prepared::{PreparedRequest, request_to_curl};
pub use response::RawResponse;
pub use rest::{AdminRequest, Body, RestTransport, Target};

use crate::{Error, ErrorKind};

/// Maps reqwest errors to SDK errors.
pub(crate) fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::new(ErrorKind::Timeout, format!("request timed out: {}", e)).with_source(e)
    } else if e.is_connect() {
        Error::new(ErrorKind::Connection, format!("connection failed: {}", e)).with_source(e)
    } else if e.is_request() {
        Error::new(ErrorKind::Transport, format!("invalid request: {}", e)).with_source(e)
    } else {
        Error::new(ErrorKind::Transport, format!("HTTP error: {}", e)).with_source(e)
    }
}
