use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, Document, Resource, ResourceDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Draft,
    Manual,
    Live,
}

pub struct Flows<'a> {
    client: &'a Client,
}

impl<'a> Flows<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<CollectionDocument> {
        self.client.get("flows", query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ResourceDocument> {
        self.client.get(&format!("flows/{}", id), &[]).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: FlowStatus) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new("flow", json!({ "status": status })).with_id(id));
        self.client.patch(&format!("flows/{}", id), &body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("flows/{}", id)).await
    }
}
