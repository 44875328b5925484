//! Billing: invoices, their line items and payment transactions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::kinds;
use crate::resource::{EntityId, Resource, ResourceClient};
use crate::transport::AdminRequest;
use crate::Error;

/// States an invoice can be moved to. Which moves are legal depends on the
/// current state; the server decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceState {
    /// Cancelled by the provider.
    Cancelled,
    /// Charging failed.
    Failed,
    /// Paid.
    Paid,
    /// Charged but not paid.
    Unpaid,
    /// Waiting to be charged.
    Pending,
    /// Closed for new line items.
    Finalized,
    /// Still collecting line items.
    Open,
}

impl InvoiceState {
    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceState::Cancelled => "cancelled",
            InvoiceState::Failed => "failed",
            InvoiceState::Paid => "paid",
            InvoiceState::Unpaid => "unpaid",
            InvoiceState::Pending => "pending",
            InvoiceState::Finalized => "finalized",
            InvoiceState::Open => "open",
        }
    }
}

impl fmt::Display for InvoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceClient {
    /// Lists the invoices of one account (`<url>/api/accounts/<id>/invoices`).
    pub async fn list_by_account(
        &self,
        account_id: impl Into<EntityId>,
    ) -> Result<Vec<Resource>, Error> {
        self.ensure_kind(&[&kinds::INVOICE], "list_by_account")?;
        let url = self.account_invoices_url(&account_id.into());
        tracing::info!(op = "list", kind = %self.kind(), url = %url, "listing invoices by account");
        let response = self.client().request(AdminRequest::get(url)).await?;
        self.wrap_many(response)
    }

    /// Reads one invoice of one account. Fetches immediately.
    pub async fn read_by_account(
        &self,
        entity_id: impl Into<EntityId>,
        account_id: impl Into<EntityId>,
    ) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::INVOICE], "read_by_account")?;
        let entity_id = entity_id.into();
        let url = format!(
            "{}/{}",
            self.account_invoices_url(&account_id.into()),
            urlencoding::encode(entity_id.as_str())
        );
        let response = self.client().request(AdminRequest::get(url)).await?;
        self.wrap(response)
    }

    /// Moves an invoice to `state`: PUT `<invoice>/state` with `{"state": ..}`.
    pub async fn state_update(
        &self,
        entity_id: impl Into<EntityId>,
        state: InvoiceState,
    ) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::INVOICE], "state_update")?;
        let url = format!("{}/state", self.entity_url(Some(&entity_id.into())));
        tracing::info!(op = "set_state", kind = %self.kind(), state = %state, url = %url, "invoice state change");
        let response = self
            .client()
            .request(AdminRequest::put(url).json(json!({ "state": state })))
            .await?;
        self.wrap(response)
    }

    /// Charges an invoice: POST `<invoice>/charge`.
    pub async fn charge(&self, entity_id: impl Into<EntityId>) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::INVOICE], "charge")?;
        let url = format!("{}/charge", self.entity_url(Some(&entity_id.into())));
        tracing::info!(op = "charge", url = %url, "charging invoice");
        let response = self.client().request(AdminRequest::post(url)).await?;
        self.wrap(response)
    }

    fn account_invoices_url(&self, account_id: &EntityId) -> String {
        format!(
            "{}/api/accounts/{}/invoices",
            self.client().url(),
            urlencoding::encode(account_id.as_str())
        )
    }
}

impl Resource {
    /// Line items of an invoice.
    pub fn line_items(&self) -> ResourceClient {
        self.child(&kinds::LINE_ITEM)
    }

    /// Payment transactions of an invoice.
    pub fn payment_transactions(&self) -> ResourceClient {
        self.child(&kinds::PAYMENT_TRANSACTION)
    }

    /// Moves this invoice to `state`.
    pub async fn state_update(&self, state: InvoiceState) -> Result<Resource, Error> {
        self.collection()
            .state_update(self.require_id()?.clone(), state)
            .await
    }

    /// Charges this invoice.
    pub async fn charge(&self) -> Result<Resource, Error> {
        self.collection().charge(self.require_id()?.clone()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod wiremock_tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_util::client_for;

    fn invoice(id: u64, state: &str) -> serde_json::Value {
        json!({"invoice": {"id": id, "friendly_id": format!("2026-01-{:08}", id), "state": state}})
    }

    #[tokio::test]
    async fn test_by_account() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts/21/invoices.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "invoices": [invoice(1, "open"), invoice(2, "paid")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/accounts/21/invoices/2.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice(2, "paid")))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let invoices = client.invoices();
        let listed = invoices.list_by_account(21).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].url().ends_with("/api/invoices/1"));

        let read = invoices.read_by_account(2, 21).await.unwrap();
        assert_eq!(read.attr_str("state"), Some("paid"));
        assert_eq!(read.entity_name(), Some("2026-01-00000002"));
    }

    #[tokio::test]
    async fn test_state_update_and_charge() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/invoices/1/state.json"))
            .and(body_json(json!({"state": "finalized"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice(1, "finalized")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/invoices/1/charge.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice(1, "paid")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let invoice = client.invoices().read(1);
        let finalized = invoice.state_update(InvoiceState::Finalized).await.unwrap();
        assert_eq!(finalized.attr_str("state"), Some("finalized"));
        let charged = invoice.charge().await.unwrap();
        assert_eq!(charged.attr_str("state"), Some("paid"));
    }

    #[test]
    fn test_children() {
        let client = crate::test_util::offline_client();
        let invoice = client.invoices().read(1);
        assert!(invoice.line_items().url().ends_with("/api/invoices/1/line_items"));
        assert!(
            invoice
                .payment_transactions()
                .url()
                .ends_with("/api/invoices/1/payment_transactions")
        );
    }

    #[test]
    fn test_state_wire_values() {
        assert_eq!(serde_json::to_value(InvoiceState::Cancelled).unwrap(), json!("cancelled"));
        assert_eq!(InvoiceState::Open.to_string(), "open");
    }
}
