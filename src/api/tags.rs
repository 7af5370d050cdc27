use serde_json::json;

use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, Document, Resource, ResourceDocument};

pub struct Tags<'a> {
    client: &'a Client,
}

impl<'a> Tags<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<CollectionDocument> {
        self.client.get("tags", query).await
    }

    /// Creates a tag, optionally inside a tag group (otherwise the default group).
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, name: &str, tag_group_id: Option<&str>) -> Result<ResourceDocument> {
        let mut resource = Resource::new("tag", json!({ "name": name }));
        if let Some(group) = tag_group_id {
            resource = resource.with_relationships(json!({
                "tag-group": { "data": { "type": "tag-group", "id": group } }
            }));
        }
        self.client.post("tags", &Document::new(resource)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("tags/{}", id)).await
    }
}
