//! The generic resource framework.
//!
//! One [`ResourceClient`] (a collection handle) and one [`Resource`] (a single
//! entity) serve every kind of remote object; a [`ResourceKind`] descriptor
//! supplies what differs between kinds. Collections nest below resources to
//! arbitrary depth and compose their URLs by walking the parent chain.
//!
//! ```text
//! Client ──► services ──► service 42 ──► proxy ──► mapping_rules ──► rule 7
//!            /admin/api/services/42/proxy/mapping_rules/7
//! ```

mod client;
pub mod envelope;
mod id;
mod kind;
pub mod kinds;
mod pager;
#[allow(clippy::module_inception)]
mod resource;
mod state;

pub use client::ResourceClient;
pub use envelope::Entity;
pub use id::EntityId;
pub use kind::{Anchor, ResourceKind};
pub use pager::ListRequest;
pub use resource::Resource;
