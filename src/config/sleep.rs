//! Injectable sleeping for retry and polling loops.

use std::{fmt, future::Future, pin::Pin, time::Duration};

/// A type alias for the boxed future returned by sleepers.
pub type SleepFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Suspends a retry loop between attempts.
///
/// Every bounded retry loop in the SDK (the [`ApiClient`](crate::ApiClient)
/// and tenant readiness polling) waits through a `Sleeper`, so tests can
/// observe the backoff schedule without waiting in real time.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn Sleeper>`.
///
/// ## Example
///
/// ```rust
/// use threescale::config::{SleepFuture, Sleeper};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct NoSleep;
///
/// impl Sleeper for NoSleep {
///     fn sleep(&self, _duration: Duration) -> SleepFuture {
///         Box::pin(async {})
///     }
/// }
/// ```
pub trait Sleeper: Send + Sync + fmt::Debug {
    /// Returns a future that completes after `duration`.
    fn sleep(&self, duration: Duration) -> SleepFuture;
}

/// The default sleeper, backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}
