use serde_json::{Map, Value, json};

use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, Document, Resource, ResourceDocument};

pub struct Images<'a> {
    client: &'a Client,
}

impl<'a> Images<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<CollectionDocument> {
        self.client.get("images", query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ResourceDocument> {
        self.client.get(&format!("images/{}", id), &[]).await
    }

    /// Imports an image that the API fetches from `url`.
    #[tracing::instrument(skip(self))]
    pub async fn import_from_url(&self, url: &str, name: Option<&str>) -> Result<ResourceDocument> {
        let mut attributes = Map::new();
        attributes.insert("import_from_url".to_string(), json!(url));
        if let Some(name) = name {
            attributes.insert("name".to_string(), json!(name));
        }
        let body = Document::new(Resource::new("image", Value::Object(attributes)));
        self.client.post("images", &body).await
    }

    /// Renames and/or hides an image. Unset arguments are left unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        hidden: Option<bool>,
    ) -> Result<ResourceDocument> {
        let mut attributes = Map::new();
        if let Some(name) = name {
            attributes.insert("name".to_string(), json!(name));
        }
        if let Some(hidden) = hidden {
            attributes.insert("hidden".to_string(), json!(hidden));
        }
        let body = Document::new(Resource::new("image", Value::Object(attributes)).with_id(id));
        self.client.patch(&format!("images/{}", id), &body).await
    }
}
