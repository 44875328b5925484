//! Integration tests for the 3scale Rust SDK.
//!
//! These tests run against a live tenant and create (then delete) their own
//! services, accounts and applications.
//!
//! # Running Tests
//!
//! ```bash
//! export THREESCALE_PROVIDER_URL=https://acme-admin.3scale.net
//! export THREESCALE_PROVIDER_TOKEN=...
//!
//! # Run integration tests
//! cargo test --features integration-tests --test integration
//!
//! # Run with logs
//! RUST_LOG=threescale=debug cargo test --features integration-tests --test integration -- --nocapture
//! ```
//!
//! # Environment Variables
//!
//! - `THREESCALE_PROVIDER_URL`, `THREESCALE_PROVIDER_TOKEN`: the tenant (required)
//! - `THREESCALE_SSL_VERIFY`: set to `false` for self-signed installations
//! - `THREESCALE_MASTER_URL`, `THREESCALE_MASTER_TOKEN`: enable the tenant tests

mod account_tests;
mod api_client_tests;
mod common;
mod service_tests;
mod tenant_tests;
