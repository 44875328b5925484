//! Error types for the 3scale SDK.
//!
//! Every fallible operation returns [`Error`]. Two families matter to callers:
//!
//! - **API errors**: the admin API answered with a status >= 400. The error
//!   carries the status code, the reason phrase and the raw body, see
//!   [`Error::status()`], [`Error::reason()`] and [`Error::body()`].
//! - **Configuration errors**: the SDK was asked to do something it cannot
//!   express (unknown auth mode, unknown credentials location, missing
//!   settings). These are raised before any network call and never retried.
//!
//! ```rust,ignore
//! match client.services().fetch(42).await {
//!     Ok(service) => println!("{:?}", service.get("system_name")),
//!     Err(err) if err.status() == Some(404) => println!("no such service"),
//!     Err(err) => return Err(err),
//! }
//! ```

#[allow(clippy::module_inception)]
mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for 3scale operations.
pub type Result<T> = std::result::Result<T, Error>;
