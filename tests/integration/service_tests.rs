//! Services and their nested configuration.

use serde_json::json;

use crate::common::{TestFixture, provider_client, unique_name};

/// A created service can be read by id and by system name, then deleted.
#[tokio::test]
async fn test_service_lifecycle() {
    let client = provider_client().await.expect("provider client");
    let name = unique_name("rs-svc");

    let service = client
        .services()
        .create(json!({"name": name, "system_name": name}))
        .await
        .expect("create service");
    let id = service.entity_id().expect("service id").clone();

    let mut read = client.services().read(&id);
    assert_eq!(
        read.get_str("system_name").await.expect("read").as_deref(),
        Some(name.as_str())
    );

    let by_name = client
        .services()
        .read_by_name(&name)
        .await
        .expect("read by name")
        .expect("service listed");
    assert_eq!(by_name.entity_id(), Some(&id));

    read.set("description", "updated by the rust sdk");
    read.update().await.expect("update");
    assert_eq!(
        read.attr_str("description"),
        Some("updated by the rust sdk")
    );

    assert!(service.delete().await.expect("delete"));
    assert!(!client.services().exists(&id).await.expect("exists"));
}

/// Metrics, methods and mapping rules nest below a service.
#[tokio::test]
async fn test_nested_collections() {
    let fixture = TestFixture::create().await.expect("fixture");

    let hits = fixture
        .service
        .metrics()
        .read_by_name("hits")
        .await
        .expect("list metrics")
        .expect("hits metric exists");
    let method = hits
        .methods()
        .create(json!({"friendly_name": "rs-method", "system_name": "rs_method"}))
        .await
        .expect("create method");
    assert!(method.url().contains("/metrics/"));

    let rules = fixture.service.mapping_rules();
    let rule = rules
        .create(json!({
            "http_method": "GET",
            "pattern": "/rs-sdk",
            "metric_id": hits.entity_id().expect("metric id").to_json(),
            "delta": 1
        }))
        .await
        .expect("create mapping rule");
    assert!(rules.exists(rule.entity_id().expect("rule id")).await.expect("exists"));

    fixture.cleanup().await.expect("cleanup");
}

/// The proxy is a singleton that can be updated and deployed.
#[tokio::test]
async fn test_proxy_update_and_deploy() {
    let fixture = TestFixture::create().await.expect("fixture");

    let mut proxy = fixture.service.proxy();
    proxy.set("api_test_path", "/get");
    proxy.update().await.expect("update proxy");
    assert_eq!(proxy.attr_str("api_test_path"), Some("/get"));

    proxy.deploy().await.expect("deploy");
    let latest = fixture
        .service
        .proxy()
        .configs()
        .latest(threescale::admin::SANDBOX)
        .await
        .expect("latest config");
    assert!(latest.entity_id().is_some());

    fixture.cleanup().await.expect("cleanup");
}
