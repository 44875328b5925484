//! Accounts, applications and their state transitions.

use crate::common::TestFixture;

/// A freshly created account can be approved and moved back to pending.
#[tokio::test]
async fn test_account_states() {
    let fixture = TestFixture::create().await.expect("fixture");

    let pending = fixture.account.make_pending().await.expect("make pending");
    assert_eq!(pending.attr_str("state"), Some("pending"));

    let approved = fixture.account.approve().await.expect("approve");
    assert_eq!(approved.attr_str("state"), Some("approved"));

    fixture.cleanup().await.expect("cleanup");
}

/// Applications can be suspended and resumed.
#[tokio::test]
async fn test_application_suspend_resume() {
    let fixture = TestFixture::create().await.expect("fixture");

    let suspended = fixture.application.suspend().await.expect("suspend");
    assert_eq!(suspended.attr_str("state"), Some("suspended"));
    let live = fixture.application.resume().await.expect("resume");
    assert_eq!(live.attr_str("state"), Some("live"));

    fixture.cleanup().await.expect("cleanup");
}

/// Listing accounts pages through every account.
#[tokio::test]
async fn test_accounts_listed() {
    let fixture = TestFixture::create().await.expect("fixture");

    let accounts = fixture.client.accounts().list().await.expect("list");
    assert!(
        accounts
            .iter()
            .any(|a| a.entity_id() == fixture.account.entity_id())
    );

    fixture.cleanup().await.expect("cleanup");
}
