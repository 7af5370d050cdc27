//! JSON:API envelope shared by all resource endpoints.

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Query parameter carrying the pagination cursor.
pub const PAGE_CURSOR_PARAM: &str = "page[cursor]";

/// Top-level document: `{"data": ..., "links": ..., "included": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource>,
}

/// A document holding a single resource.
pub type ResourceDocument = Document<Resource>;

/// A document holding a page of resources.
pub type CollectionDocument = Document<Vec<Resource>>;

impl<T> Document<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            links: None,
            included: Vec::new(),
        }
    }

    /// The `page[cursor]` value of the next page, if there is one.
    pub fn next_page_cursor(&self) -> Option<String> {
        let next = self.links.as_ref()?.next.as_deref()?;
        let url = Url::parse(next).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == PAGE_CURSOR_PARAM)
            .map(|(_, v)| v.into_owned())
    }
}

/// A resource object. Attributes are left as JSON for the caller to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub attributes: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl Resource {
    pub fn new(kind: impl Into<String>, attributes: Value) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            attributes,
            relationships: None,
            links: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_relationships(mut self, relationships: Value) -> Self {
        self.relationships = Some(relationships);
        self
    }

    /// Looks up a single attribute, returning `None` if it is absent or of another shape.
    pub fn attribute<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.attributes
            .get(name)
            .and_then(|v| T::deserialize(v).ok())
    }

    /// Decodes all attributes into a caller-defined type.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.attributes)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn test_decode_collection() {
        let body = r#"{
            "data": [
                {"type": "tag", "id": "t1", "attributes": {"name": "vip"},
                 "links": {"self": "https://a.klaviyo.com/api/tags/t1/"}},
                {"type": "tag", "id": "t2", "attributes": {"name": "new"}}
            ],
            "links": {
                "self": "https://a.klaviyo.com/api/tags/",
                "next": "https://a.klaviyo.com/api/tags/?page%5Bcursor%5D=bmV4dA"
            }
        }"#;
        let doc: CollectionDocument = serde_json::from_str(body).unwrap();

        assert_eq!(doc.data.len(), 2);
        assert_eq!(doc.data[0].kind, "tag");
        assert_eq!(doc.data[1].id.as_deref(), Some("t2"));
        assert_eq!(doc.data[0].attribute::<String>("name").as_deref(), Some("vip"));
        assert_eq!(doc.next_page_cursor().as_deref(), Some("bmV4dA"));
        assert!(doc.included.is_empty());
    }

    #[test]
    fn test_next_page_cursor_absent() {
        let doc = Document::new(Vec::<Resource>::new());
        assert_eq!(doc.next_page_cursor(), None);

        let mut doc = Document::new(Vec::<Resource>::new());
        doc.links = Some(Links {
            next: Some("https://a.klaviyo.com/api/tags/?sort=name".to_string()),
            ..Links::default()
        });
        assert_eq!(doc.next_page_cursor(), None);
    }

    #[test]
    fn test_serialize_request_document() {
        let doc = Document::new(
            Resource::new("tag", json!({"name": "vip"}))
                .with_relationships(json!({"tag-group": {"data": {"type": "tag-group", "id": "g1"}}})),
        );
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            value,
            json!({
                "data": {
                    "type": "tag",
                    "attributes": {"name": "vip"},
                    "relationships": {"tag-group": {"data": {"type": "tag-group", "id": "g1"}}}
                }
            })
        );
    }

    #[test]
    fn test_attribute_wrong_shape_is_none() {
        let resource = Resource::new("flow", json!({"status": "live"}));
        assert_eq!(resource.attribute::<u32>("status"), None);
        assert_eq!(resource.attribute::<String>("missing"), None);
    }

    #[test]
    fn test_attributes_as() {
        #[derive(Deserialize)]
        struct Flow {
            name: String,
            archived: bool,
        }

        let resource = Resource::new("flow", json!({"name": "Welcome", "archived": false}));
        let flow: Flow = resource.attributes_as().unwrap();
        assert_eq!(flow.name, "Welcome");
        assert!(!flow.archived);

        let err = resource.attributes_as::<Vec<String>>().unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
