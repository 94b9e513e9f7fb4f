use crate::core::errors::LedgerError;
use crate::core::models::{CreateExpenseResponse, ExpenseDraft};
use crate::infrastructure::gateway::RemoteGateway;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, Url};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceAdjustment<'a> {
    debtor: &'a str,
    creditor: &'a str,
    delta: f64,
}

/// JSON-over-HTTP gateway. Request timeouts are whatever the client defaults to.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        HttpGateway {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Appends `segments` to the base URL, percent-encoding each one so ids
    /// cannot add path levels, a query or a fragment.
    fn url(&self, segments: &[&str]) -> Result<Url, LedgerError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LedgerError::Remote(format!("invalid gateway url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| LedgerError::Remote(format!("gateway url {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: Response) -> Result<Response, LedgerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LedgerError::Remote(format!("HTTP {}: {}", status, body)))
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn create_expense(&self, expense: &ExpenseDraft) -> Result<CreateExpenseResponse, LedgerError> {
        debug!("POST expense for group {}", expense.group_id);
        let response = self
            .client
            .post(self.url(&["expenses"])?)
            .json(expense)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<CreateExpenseResponse>().await?)
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<(), LedgerError> {
        debug!("DELETE expense {}", expense_id);
        let response = self
            .client
            .delete(self.url(&["expenses", expense_id])?)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn adjust_balance(
        &self,
        group_id: &str,
        debtor: &str,
        creditor: &str,
        delta: f64,
    ) -> Result<(), LedgerError> {
        let response = self
            .client
            .post(self.url(&["groups", group_id, "balances"])?)
            .json(&BalanceAdjustment {
                debtor,
                creditor,
                delta,
            })
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ParticipantShare;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            group_id: "g1".to_string(),
            amount: 30.0,
            paid_by: "alice".to_string(),
            participants: vec![ParticipantShare::new("bob", 15.0)],
            note: Some("groceries".to_string()),
            place: None,
        }
    }

    #[tokio::test]
    async fn create_expense_posts_camel_case_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/expenses"))
            .and(body_partial_json(json!({ "groupId": "g1", "paidBy": "alice" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "expenseId": "e-1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(format!("{}/", server.uri()));
        let response = gateway.create_expense(&draft()).await.unwrap();
        assert_eq!(response, CreateExpenseResponse::created("e-1"));
    }

    #[tokio::test]
    async fn server_error_maps_to_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/expenses"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(server.uri());
        let err = gateway.create_expense(&draft()).await.unwrap_err();
        assert!(matches!(err, LedgerError::Remote(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn balance_adjustment_targets_group_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/groups/g1/balances"))
            .and(body_partial_json(json!({ "debtor": "bob", "creditor": "alice", "delta": 15.0 })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(server.uri());
        gateway.adjust_balance("g1", "bob", "alice", 15.0).await.unwrap();
    }

    #[tokio::test]
    async fn ids_are_encoded_as_single_path_segments() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/expenses/a%2Fb%3Fc%23d"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/groups/room%2012%2F..%2Fadmin/balances"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(server.uri());
        gateway.delete_expense("a/b?c#d").await.unwrap();
        gateway
            .adjust_balance("room 12/../admin", "bob", "alice", 15.0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn base_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/expenses/e-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(format!("{}/api/v1/", server.uri()));
        gateway.delete_expense("e-1").await.unwrap();
    }

    #[tokio::test]
    async fn unparseable_base_url_is_a_remote_error() {
        let gateway = HttpGateway::new("not a url");
        let err = gateway.delete_expense("e-1").await.unwrap_err();
        assert!(matches!(err, LedgerError::Remote(msg) if msg.contains("invalid gateway url")));
    }
}
