//! Webhook settings of the tenant.

use std::fmt;

use serde_json::{Map, Value};

use crate::resource::ResourceClient;
use crate::transport::{AdminRequest, RawResponse};
use crate::Error;

/// A family of events webhooks can be enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookType {
    /// Application key events.
    Keys,
    /// User events.
    Users,
    /// Application events.
    Applications,
    /// Account events.
    Accounts,
}

impl WebhookType {
    /// The event flags this family enables.
    pub fn events(&self) -> &'static [&'static str] {
        match self {
            WebhookType::Keys => &[
                "application_key_created_on",
                "application_key_deleted_on",
                "application_key_updated_on",
            ],
            WebhookType::Users => &["user_created_on", "user_updated_on", "user_deleted_on"],
            WebhookType::Applications => &[
                "application_created_on",
                "application_updated_on",
                "application_suspended_on",
                "application_plan_changed_on",
                "application_user_key_updated_on",
                "application_deleted_on",
            ],
            WebhookType::Accounts => &[
                "account_created_on",
                "account_updated_on",
                "account_deleted_on",
                "account_plan_changed_on",
            ],
        }
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const ALL_TYPES: [WebhookType; 4] = [
    WebhookType::Keys,
    WebhookType::Users,
    WebhookType::Applications,
    WebhookType::Accounts,
];

/// The tenant's webhook settings (`/admin/api/webhooks`).
///
/// ```rust,no_run
/// # async fn example(client: threescale::Client) -> threescale::Result<()> {
/// use threescale::admin::WebhookType;
///
/// let webhooks = client.webhooks();
/// webhooks.setup(WebhookType::Accounts, "https://hooks.example.com/3scale").await?;
/// // ...
/// webhooks.clear().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Webhooks {
    collection: ResourceClient,
}

impl Webhooks {
    pub(crate) fn new(collection: ResourceClient) -> Self {
        Self { collection }
    }

    /// The settings URL.
    pub fn url(&self) -> String {
        self.collection.url()
    }

    /// PUTs raw settings and returns the response untouched.
    pub async fn update(&self, params: impl Into<Value>) -> Result<RawResponse, Error> {
        let url = self.collection.url();
        tracing::info!(op = "update", kind = %self.collection.kind(), url = %url, "updating webhooks");
        self.collection
            .client()
            .request(AdminRequest::put(url).json(params))
            .await
    }

    /// Activates webhooks for one family of events, delivered to `url`.
    pub async fn setup(&self, webhook_type: WebhookType, url: &str) -> Result<RawResponse, Error> {
        let mut params = Map::new();
        params.insert("url".to_string(), Value::from(url));
        params.insert("active".to_string(), Value::from("true"));
        params.insert("provider_actions".to_string(), Value::from("true"));
        for event in webhook_type.events() {
            params.insert((*event).to_string(), Value::from("true"));
        }
        tracing::debug!(webhook_type = %webhook_type, "setting up webhooks");
        self.update(Value::Object(params)).await
    }

    /// Turns every webhook off and clears the delivery URL.
    pub async fn clear(&self) -> Result<RawResponse, Error> {
        let mut params = Map::new();
        params.insert("url".to_string(), Value::from(""));
        params.insert("active".to_string(), Value::from("false"));
        params.insert("provider_actions".to_string(), Value::from("false"));
        for event in ALL_TYPES.iter().flat_map(WebhookType::events) {
            params.insert((*event).to_string(), Value::from("false"));
        }
        self.update(Value::Object(params)).await
    }
}
