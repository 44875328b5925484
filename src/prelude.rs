//! Prelude module for convenient imports.
//!
//! ```rust
//! use threescale::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client and its builder
//! - Collections, resources and kind descriptors
//! - Error types
//! - Application credentials and the API client

pub use crate::{
    admin::{Tenant, UsageQuery, WebhookType},
    api_client::{ApiClient, ApiResponse, Endpoint},
    application::Application,
    auth::{AuthMode, ClientAuth, CredentialsLocation},
    client::{Client, ClientBuilder},
    config::{RetryConfig, TlsConfig},
    error::{Error, ErrorKind, Result},
    resource::{Entity, EntityId, Resource, ResourceClient, ResourceKind, kinds},
};
