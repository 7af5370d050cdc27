use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, Document, Resource, ResourceDocument};

/// Editor a template was authored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorType {
    Code,
    SystemDragging,
    UserDragging,
}

pub struct Templates<'a> {
    client: &'a Client,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<CollectionDocument> {
        self.client.get("templates", query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ResourceDocument> {
        self.client.get(&format!("templates/{}", id), &[]).await
    }

    #[tracing::instrument(skip(self, html))]
    pub async fn create(
        &self,
        name: &str,
        editor_type: EditorType,
        html: &str,
    ) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new(
            "template",
            json!({ "name": name, "editor_type": editor_type, "html": html }),
        ));
        self.client.post("templates", &body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("templates/{}", id)).await
    }

    /// Renders template `id` with `context` variables.
    #[tracing::instrument(skip(self, context))]
    pub async fn render(&self, id: &str, context: Value) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new("template", json!({ "context": context })).with_id(id));
        self.client.post("template-render", &body).await
    }
}
