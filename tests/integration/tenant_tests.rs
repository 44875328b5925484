//! Tenant creation through the master API.

use serde_json::json;

use crate::common::{master_client, unique_name};

/// A new tenant becomes reachable with its own admin token.
#[tokio::test]
async fn test_tenant_lifecycle() {
    let Some(master) = master_client().await else {
        eprintln!("THREESCALE_MASTER_URL/THREESCALE_MASTER_TOKEN not set, skipping");
        return;
    };
    let name = unique_name("rs-tenant");

    let tenant = master
        .create_tenant(json!({
            "org_name": name,
            "username": "admin",
            "email": format!("{}@example.com", name),
            "password": "123456"
        }))
        .await
        .expect("create tenant");
    assert!(tenant.admin_base_url().is_some());
    assert!(tenant.admin_token().is_some());

    assert!(tenant.wait_tenant_ready().await.expect("readiness"));
    let admin = tenant.admin_api(false).await.expect("tenant client");
    assert!(!admin.services().list().await.expect("services").is_empty());

    assert!(tenant.delete().await.expect("delete tenant"));
}
