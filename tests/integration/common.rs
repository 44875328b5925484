//! Common test harness for 3scale integration tests.

use std::sync::Once;

use anyhow::{Context, Result};
use serde_json::json;
use threescale::{Client, Resource};

static TRACING: Once = Once::new();

/// Installs a test subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A unique, lowercase name for test entities.
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{:08x}", prefix, fastrand::u32(..))
}

/// Builds the tenant client from the environment.
pub async fn provider_client() -> Result<Client> {
    init_tracing();
    Client::from_env()
        .await
        .context("THREESCALE_PROVIDER_URL and THREESCALE_PROVIDER_TOKEN must be set")
}

/// Builds the master client, or `None` when it is not configured.
pub async fn master_client() -> Option<Client> {
    init_tracing();
    Client::master_from_env().await.ok()
}

/// A service plus a developer account with one application on it.
pub struct TestFixture {
    pub client: Client,
    pub service: Resource,
    pub account: Resource,
    pub application: Resource,
}

impl TestFixture {
    /// Creates a service, an application plan, an account and an application.
    pub async fn create() -> Result<Self> {
        let client = provider_client().await?;

        let name = unique_name("rs-sdk");
        let service = client
            .services()
            .create(json!({"name": name, "system_name": name}))
            .await
            .context("Failed to create service")?;
        let plan = service
            .app_plans()
            .create(json!({"name": format!("{}-plan", name)}))
            .await
            .context("Failed to create application plan")?;

        let account = client
            .accounts()
            .create(json!({
                "org_name": name,
                "username": name,
                "email": format!("{}@example.com", name),
                "password": "123456"
            }))
            .await
            .context("Failed to create account")?;

        let plan_id = plan.entity_id().context("plan has no id")?.clone();
        let application = account
            .applications()
            .create(json!({
                "name": format!("{}-app", name),
                "description": "integration test application",
                "plan_id": plan_id.to_json()
            }))
            .await
            .context("Failed to create application")?;

        Ok(Self {
            client,
            service,
            account,
            application,
        })
    }

    /// Deletes everything the fixture created.
    pub async fn cleanup(self) -> Result<()> {
        self.application.delete().await?;
        self.account.delete().await?;
        self.service.delete().await?;
        Ok(())
    }
}
