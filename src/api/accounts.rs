use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, ResourceDocument};

/// The account that owns the API key.
pub struct Accounts<'a> {
    client: &'a Client,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<CollectionDocument> {
        self.client.get("accounts", &[]).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ResourceDocument> {
        self.client.get(&format!("accounts/{}", id), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::test_client;

    #[tokio::test]
    async fn test_list_accounts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/accounts/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": [{"type": "account", "id": "AbC123",
                    "attributes": {"contact_information": {"organization_name": "Acme"},
                                   "timezone": "America/New_York"}}],
                    "links": {"self": "https://a.klaviyo.com/api/accounts/"}}"#,
            )
            .create_async()
            .await;

        let client = test_client(&format!("{}/api", server.url()));
        let doc = client.accounts().list().await.unwrap();

        mock.assert_async().await;
        assert_eq!(doc.data.len(), 1);
        assert_eq!(doc.data[0].id.as_deref(), Some("AbC123"));
        assert_eq!(
            doc.data[0].attribute::<String>("timezone").as_deref(),
            Some("America/New_York")
        );
    }

    #[tokio::test]
    async fn test_get_account_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/accounts/AbC123/")
            .with_status(401)
            .with_body(
                r#"{"errors": [{"id": "e1", "code": "not_authenticated", "title": "Authentication credentials were not provided.", "detail": "Missing or invalid private key."}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&format!("{}/api", server.url()));
        let err = client.accounts().get("AbC123").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status(), Some(401));
        match err {
            crate::Error::Response(e) => assert_eq!(e.errors()[0].code, "not_authenticated"),
            other => panic!("Expected Response error, got {:?}", other),
        }
    }
}
