//! Calls through the staging gateway as an application.

use crate::common::TestFixture;

/// The application's credentials get the test request through.
#[tokio::test]
async fn test_api_client_get() {
    let fixture = TestFixture::create().await.expect("fixture");

    let mut proxy = fixture.service.proxy();
    proxy.set("api_test_path", "/get");
    proxy.update().await.expect("update proxy");
    proxy.deploy().await.expect("deploy");

    let mut app = fixture
        .application
        .clone()
        .into_application()
        .expect("application");
    app.set_api_client_verify(Some(false));

    let api = app.api_client().build().await.expect("api client");
    let response = api.get("/get").await.expect("request");
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let response = app.test_request(None, None).await.expect("test request");
    assert!(response.is_success());

    fixture.cleanup().await.expect("cleanup");
}
