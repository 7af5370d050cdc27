use serde_json::Value;

use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, Document, Resource, ResourceDocument};

/// Catalog items.
pub struct Catalog<'a> {
    client: &'a Client,
}

impl<'a> Catalog<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list_items(&self, query: &[(&str, &str)]) -> Result<CollectionDocument> {
        self.client.get("catalog-items", query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, id: &str) -> Result<ResourceDocument> {
        self.client.get(&format!("catalog-items/{}", id), &[]).await
    }

    #[tracing::instrument(skip(self, attributes))]
    pub async fn create_item(&self, attributes: Value) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new("catalog-item", attributes));
        self.client.post("catalog-items", &body).await
    }

    #[tracing::instrument(skip(self, attributes))]
    pub async fn update_item(&self, id: &str, attributes: Value) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new("catalog-item", attributes).with_id(id));
        self.client.patch(&format!("catalog-items/{}", id), &body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("catalog-items/{}", id)).await
    }
}
