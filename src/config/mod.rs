//! Configuration types for the 3scale SDK.
//!
//! This module provides configuration options for:
//! - [`RetryConfig`]: Attempt budgets and [`Backoff`] schedules
//! - [`TlsConfig`]: TLS/SSL settings
//! - [`Sleeper`]: Injectable delays for retry and polling loops
//! - [`EnvConfig`]: Connection settings from the environment

mod env;
mod retry;
mod sleep;
mod tls;

pub use env::{
    EnvConfig, MASTER_TOKEN_VAR, MASTER_URL_VAR, PROVIDER_TOKEN_VAR, PROVIDER_URL_VAR,
    SSL_VERIFY_VAR,
};
pub use retry::{Backoff, RetryConfig};
pub use sleep::{SleepFuture, Sleeper, TokioSleeper};
pub use tls::TlsConfig;
