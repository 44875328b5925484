//! Shared helpers for unit tests.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;

use parking_lot::Mutex;
use wiremock::MockServer;

use crate::config::{SleepFuture, Sleeper};
use crate::Client;

pub(crate) const TEST_TOKEN: &str = "test-token";

/// A client for URL composition tests; it never sends anything.
pub(crate) fn offline_client() -> Client {
    futures::executor::block_on(
        Client::builder()
            .url("https://tenant-admin.example.com")
            .token(TEST_TOKEN)
            .build(),
    )
    .unwrap()
}

/// A client pointed at a wiremock server.
pub(crate) async fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .url(server.uri())
        .token(TEST_TOKEN)
        .build()
        .await
        .unwrap()
}

/// Records requested delays and returns immediately.
#[derive(Debug, Default)]
pub(crate) struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture {
        self.delays.lock().push(duration);
        Box::pin(async {})
    }
}
