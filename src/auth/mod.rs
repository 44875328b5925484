//! Authentication of calls against an application's proxied API.
//!
//! The admin API itself is authenticated with the access token given to the
//! [`Client`](crate::Client). Calls made through an
//! [`ApiClient`](crate::ApiClient) carry the *application's* credentials
//! instead, placed where the service's gateway expects them:
//!
//! | `credentials_location` | Placement                                 |
//! |------------------------|-------------------------------------------|
//! | `authorization`        | HTTP Basic, first value then second value |
//! | `headers`              | one header per credential                 |
//! | `query`                | one query parameter per credential        |
//!
//! Which credentials are used follows the service's `backend_version`
//! ([`AuthMode`]); the [`AuthRegistry`] maps each mode to an
//! [`AuthFactory`]. Additional modes can be registered at runtime.

mod factory;
mod location;
mod mode;
mod strategy;

pub use factory::{
    AppIdKeyFactory, AuthContext, AuthFactory, AuthFuture, AuthRegistry, UserKeyFactory,
};
pub use location::CredentialsLocation;
pub use mode::AuthMode;
pub use strategy::ClientAuth;
