//! Usage statistics (`<url>/stats/...`).

use serde_json::Value;

use crate::resource::EntityId;
use crate::transport::AdminRequest;
use crate::{Client, Error};

/// What an [`Analytics`] call reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSubject {
    /// An application.
    Application,
    /// A service (API product).
    Service,
    /// A backend API.
    Backend,
}

impl UsageSubject {
    /// The URL segment of the subject.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageSubject::Application => "applications",
            UsageSubject::Service => "services",
            UsageSubject::Backend => "backend_apis",
        }
    }
}

/// Parameters of a usage query.
///
/// Defaults to the `hits` metric over a `year`.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageQuery {
    metric_name: String,
    since: Option<String>,
    period: String,
    extra: Vec<(String, String)>,
}

impl Default for UsageQuery {
    fn default() -> Self {
        Self {
            metric_name: "hits".to_string(),
            since: None,
            period: "year".to_string(),
            extra: Vec::new(),
        }
    }
}

impl UsageQuery {
    /// Creates a query with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the metric system name.
    #[must_use]
    pub fn with_metric(mut self, metric_name: impl Into<String>) -> Self {
        self.metric_name = metric_name.into();
        self
    }

    /// Sets the start date (`YYYY-MM-DD` or a timestamp).
    #[must_use]
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Sets the period (`year`, `month`, `week`, `day`, `hour`, `minute`).
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    /// Adds another query parameter, such as `granularity` or `timezone`.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("metric_name".to_string(), self.metric_name.clone()),
            ("period".to_string(), self.period.clone()),
        ];
        if let Some(since) = &self.since {
            params.push(("since".to_string(), since.clone()));
        }
        params.extend(self.extra.iter().cloned());
        params
    }
}

/// Usage statistics of applications, services and backends.
#[derive(Debug, Clone)]
pub struct Analytics {
    client: Client,
}

impl Analytics {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Usage of an application.
    pub async fn list_by_application(
        &self,
        application_id: impl Into<EntityId>,
        query: &UsageQuery,
    ) -> Result<Value, Error> {
        self.usage(UsageSubject::Application, &application_id.into(), query)
            .await
    }

    /// Usage of a service.
    pub async fn list_by_service(
        &self,
        service_id: impl Into<EntityId>,
        query: &UsageQuery,
    ) -> Result<Value, Error> {
        self.usage(UsageSubject::Service, &service_id.into(), query)
            .await
    }

    /// Usage of a backend.
    pub async fn list_by_backend(
        &self,
        backend_id: impl Into<EntityId>,
        query: &UsageQuery,
    ) -> Result<Value, Error> {
        self.usage(UsageSubject::Backend, &backend_id.into(), query)
            .await
    }

    /// GETs `<url>/stats/<subject>/<id>/usage` and returns the decoded body.
    pub async fn usage(
        &self,
        subject: UsageSubject,
        entity_id: &EntityId,
        query: &UsageQuery,
    ) -> Result<Value, Error> {
        let url = format!(
            "{}/stats/{}/{}/usage",
            self.client.url(),
            subject.as_str(),
            urlencoding::encode(entity_id.as_str())
        );
        tracing::info!(
            op = "usage",
            subject = subject.as_str(),
            id = %entity_id,
            metric = %query.metric_name,
            "listing analytics"
        );
        self.client
            .request(AdminRequest::get(url).params(query.to_params()))
            .await?
            .json()
    }
}
