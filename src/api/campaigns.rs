use serde_json::Value;
use std::fmt;

use crate::Client;
use crate::error::Result;

use super::{CollectionDocument, Document, MessageContent, Resource, ResourceDocument};

/// Messaging channel. The campaigns listing requires one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }

    fn filter(&self) -> String {
        format!("equals(messages.channel,'{}')", self.as_str())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Campaigns<'a> {
    client: &'a Client,
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists campaigns on `channel`. `extra_filter` is and-ed onto the channel filter.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        channel: Channel,
        extra_filter: Option<&str>,
        page_cursor: Option<&str>,
    ) -> Result<CollectionDocument> {
        let filter = match extra_filter {
            Some(extra) => format!("and({},{})", channel.filter(), extra),
            None => channel.filter(),
        };
        let mut query = vec![("filter", filter.as_str())];
        if let Some(cursor) = page_cursor {
            query.push((super::PAGE_CURSOR_PARAM, cursor));
        }
        self.client.get("campaigns", &query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ResourceDocument> {
        self.client.get(&format!("campaigns/{}", id), &[]).await
    }

    /// Creates a campaign from raw `campaign` attributes.
    #[tracing::instrument(skip(self, attributes))]
    pub async fn create(&self, attributes: Value) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new("campaign", attributes));
        self.client.post("campaigns", &body).await
    }

    #[tracing::instrument(skip(self, attributes))]
    pub async fn update(&self, id: &str, attributes: Value) -> Result<ResourceDocument> {
        let body = Document::new(Resource::new("campaign", attributes).with_id(id));
        self.client.patch(&format!("campaigns/{}", id), &body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("campaigns/{}", id)).await
    }

    /// Fetches a campaign message together with its decoded content, if the
    /// content matches a known shape.
    #[tracing::instrument(skip(self))]
    pub async fn get_message(
        &self,
        message_id: &str,
    ) -> Result<(ResourceDocument, Option<MessageContent>)> {
        let doc: ResourceDocument = self
            .client
            .get(&format!("campaign-messages/{}", message_id), &[])
            .await?;
        let content = MessageContent::from_resource(&doc.data);
        Ok((doc, content))
    }
}
