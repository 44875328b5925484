//! Operations specific to some resource kinds.
//!
//! The generic framework in [`resource`](crate::resource) covers CRUD for
//! every kind. What lives here are the endpoints only some kinds expose:
//! signups and plan changes, proxy deploys and promotions, policy chain
//! edits, tenant billing, invoices, permissions, webhooks and analytics.
//!
//! Most of them are inherent methods on [`Resource`](crate::Resource) and
//! [`ResourceClient`](crate::ResourceClient); calling one on a resource of the
//! wrong kind fails with [`ErrorKind::InvalidArgument`](crate::ErrorKind)
//! before any request is made.

mod account;
mod analytics;
mod invoice;
mod provider;
mod proxy;
mod service;
mod tenant;
mod webhook;

pub use analytics::{Analytics, UsageQuery, UsageSubject};
pub use invoice::InvoiceState;
pub use provider::ALL_SECTIONS;
pub use proxy::{PRODUCTION, PolicyChain, ProxyConfigs, SANDBOX};
pub use tenant::Tenant;
pub use webhook::{WebhookType, Webhooks};
