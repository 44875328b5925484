//! # threescale
//!
//! Rust SDK for the 3scale API Management admin API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threescale::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> threescale::Result<()> {
//!     let client = Client::builder()
//!         .url("https://acme-admin.3scale.net")
//!         .token("provider-access-token")
//!         .build()
//!         .await?;
//!
//!     // Create a service and a metric below it
//!     let service = client
//!         .services()
//!         .create(json!({"name": "Echo API", "system_name": "echo"}))
//!         .await?;
//!     let hits = service.metrics().read_by_name("hits").await?;
//!     println!("hits metric: {:?}", hits.and_then(|m| m.entity_id().cloned()));
//!
//!     // Approve a pending account
//!     client.accounts().approve(17).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Collections and resources**: a [`ResourceClient`] is a handle on one
//!   remote collection; a [`Resource`] is one entity with a lazily loaded
//!   attribute cache and a pending-change diff.
//! - **Descriptors, not subclasses**: every kind is described by a
//!   [`ResourceKind`] in [`kinds`]; kind-specific operations are methods that
//!   check the kind before sending anything.
//! - **Errors carry the response**: a status >= 400 becomes an [`Error`] with
//!   status, reason and body, unless `throws(false)` is in effect.
//! - **Applications call their gateway**: [`Application::api_client`] builds
//!   an [`ApiClient`] that injects the application's credentials and retries
//!   transient gateway statuses.
//!
//! ## Features
//!
//! - `rustls` (default): use rustls for TLS
//! - `native-tls`: use the platform TLS stack
//! - `integration-tests`: build the live-tenant test suite

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod admin;
pub mod api_client;
mod application;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod resource;
pub mod transport;
mod user_agent;

pub mod prelude;

#[cfg(test)]
mod test_util;

pub use api_client::{ApiClient, ApiResponse, Endpoint};
pub use application::Application;
pub use client::{Client, ClientBuilder};
pub use error::{Error, ErrorKind, Result};
pub use resource::{
    Anchor, Entity, EntityId, ListRequest, Resource, ResourceClient, ResourceKind, kinds,
};

pub use config::{Backoff, RetryConfig, Sleeper, TlsConfig};
