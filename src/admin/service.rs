//! Services, their metrics and their plans.

use crate::kinds;
use crate::resource::{EntityId, Resource, ResourceClient};
use crate::transport::AdminRequest;
use crate::Error;

impl Resource {
    /// The gateway configuration of a service.
    pub fn proxy(&self) -> Resource {
        self.child(&kinds::PROXY).single()
    }

    /// Metrics of a service, or of a backend.
    pub fn metrics(&self) -> ResourceClient {
        if self.kind() == &kinds::BACKEND {
            self.child(&kinds::BACKEND_METRIC)
        } else {
            self.child(&kinds::METRIC)
        }
    }

    /// Methods of a metric.
    pub fn methods(&self) -> ResourceClient {
        self.child(&kinds::METHOD)
    }

    /// Application plans of a service.
    pub fn app_plans(&self) -> ResourceClient {
        self.child(&kinds::APPLICATION_PLAN)
    }

    /// Service plans of a service.
    pub fn service_plans(&self) -> ResourceClient {
        self.child(&kinds::SERVICE_PLAN)
    }

    /// Mapping rules: below the proxy for a service, directly below a backend
    /// or a proxy otherwise.
    pub fn mapping_rules(&self) -> ResourceClient {
        if self.kind() == &kinds::SERVICE {
            self.proxy().child(&kinds::MAPPING_RULE)
        } else if self.kind() == &kinds::BACKEND {
            self.child(&kinds::BACKEND_MAPPING_RULE)
        } else {
            self.child(&kinds::MAPPING_RULE)
        }
    }

    /// Backend usages of a service, or the usages of a backend.
    pub fn backend_usages(&self) -> ResourceClient {
        self.child(&kinds::BACKEND_USAGE)
    }

    /// The API docs bound to this service.
    pub async fn active_docs(&self) -> Result<Vec<Resource>, Error> {
        let service_id = self.require_id()?.to_json();
        self.client()
            .active_docs()
            .select_by([("service_id", service_id)])
            .await
    }

    /// Features of an application plan.
    pub fn features(&self) -> ResourceClient {
        self.child(&kinds::APPLICATION_PLAN_FEATURE)
    }

    /// Limits of an application plan for one metric.
    ///
    /// Limits live below the tenant-wide plan URL rather than below the
    /// service: `/admin/api/application_plans/<plan>/metrics/<metric>/limits`.
    pub fn limits(&self, metric: impl Into<EntityId>) -> Result<ResourceClient, Error> {
        Ok(ResourceClient::at(
            self.client().clone(),
            &kinds::LIMIT,
            self.plan_metric_url(&metric.into())?,
        ))
    }

    /// Pricing rules of an application plan for one metric.
    pub fn pricing_rules(&self, metric: impl Into<EntityId>) -> Result<ResourceClient, Error> {
        Ok(ResourceClient::at(
            self.client().clone(),
            &kinds::PRICING_RULE,
            self.plan_metric_url(&metric.into())?,
        ))
    }

    /// Every limit of an application plan, across metrics.
    pub async fn plan_limits(&self) -> Result<Vec<Resource>, Error> {
        let limits = ResourceClient::at(
            self.client().clone(),
            &kinds::LIMIT,
            self.plans_url()?,
        );
        tracing::info!(op = "list", kind = %kinds::LIMIT, url = %limits.url(), "listing plan limits");
        let response = self
            .client()
            .request(AdminRequest::get(limits.url()))
            .await?;
        limits.wrap_many(response)
    }

    /// Resolves the backend of a backend usage.
    pub async fn backend(&mut self) -> Result<Resource, Error> {
        let backend_id = self.get_id("backend_id").await?.ok_or_else(|| {
            Error::invalid_response("backend usage has no backend_id attribute")
        })?;
        Ok(self.client().backends().read(backend_id))
    }

    fn plans_url(&self) -> Result<String, Error> {
        self.collection()
            .ensure_kind(&[&kinds::APPLICATION_PLAN], "plan limits")?;
        Ok(format!(
            "{}/application_plans/{}",
            self.client().admin_api_url(),
            urlencoding::encode(self.require_id()?.as_str())
        ))
    }

    fn plan_metric_url(&self, metric: &EntityId) -> Result<String, Error> {
        Ok(format!(
            "{}/metrics/{}",
            self.plans_url()?,
            urlencoding::encode(metric.as_str())
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use crate::test_util::offline_client;

    const ADMIN: &str = "https://tenant-admin.example.com/admin/api";

    #[test]
    fn test_service_children() {
        let client = offline_client();
        let service = client.services().read(3);
        assert_eq!(service.metrics().url(), format!("{}/services/3/metrics", ADMIN));
        assert_eq!(
            service.app_plans().url(),
            format!("{}/services/3/application_plans", ADMIN)
        );
        assert_eq!(
            service.mapping_rules().url(),
            format!("{}/services/3/proxy/mapping_rules", ADMIN)
        );
        assert_eq!(
            service.backend_usages().url(),
            format!("{}/services/3/backend_usages", ADMIN)
        );
    }

    #[test]
    fn test_backend_children() {
        let client = offline_client();
        let backend = client.backends().read(4);
        assert_eq!(backend.metrics().url(), format!("{}/backend_apis/4/metrics", ADMIN));
        assert_eq!(
            backend.mapping_rules().url(),
            format!("{}/backend_apis/4/mapping_rules", ADMIN)
        );
        assert_eq!(backend.metrics().kind().key(), "backend_metric");
    }

    #[test]
    fn test_limits_live_below_tenant_plan_url() {
        let client = offline_client();
        let plan = client.services().read(3).app_plans().read(8);
        assert_eq!(
            plan.limits(12).unwrap().url(),
            format!("{}/application_plans/8/metrics/12/limits", ADMIN)
        );
        assert_eq!(
            plan.pricing_rules(12).unwrap().url(),
            format!("{}/application_plans/8/metrics/12/pricing_rules", ADMIN)
        );
        let metric = client.services().read(3).metrics().read(2);
        assert_eq!(
            metric.methods().url(),
            format!("{}/services/3/metrics/2/methods", ADMIN)
        );
    }

    #[test]
    fn test_limits_need_a_plan() {
        let client = offline_client();
        assert!(client.services().read(3).limits(1).is_err());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod wiremock_tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_util::client_for;

    #[tokio::test]
    async fn test_active_docs_filtered_by_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/active_docs.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "api_docs": [
                    {"api_doc": {"id": 1, "system_name": "a", "service_id": 3}},
                    {"api_doc": {"id": 2, "system_name": "b", "service_id": 4}},
                    {"api_doc": {"id": 3, "system_name": "c"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let docs = client.services().read(3).active_docs().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].entity_name(), Some("a"));
    }

    #[tokio::test]
    async fn test_backend_of_usage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/services/3/backend_usages/5.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "backend_usage": {"id": 5, "path": "/", "backend_id": 77}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut usage = client.services().read(3).backend_usages().read(5);
        let backend = usage.backend().await.unwrap();
        assert!(backend.url().ends_with("/admin/api/backend_apis/77"));
    }

    #[tokio::test]
    async fn test_plan_limits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/application_plans/8/limits.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "limits": [
                    {"limit": {"id": 1, "period": "day", "value": 10, "metric_id": 2}},
                    {"limit": {"id": 2, "period": "month", "value": 100, "metric_id": 3}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let plan = client.services().read(3).app_plans().read(8);
        let limits = plan.plan_limits().await.unwrap();
        assert_eq!(limits.len(), 2);
        assert_eq!(limits[1].entity_name(), Some("month"));
    }
}
