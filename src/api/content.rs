//! Campaign message content, which comes back as one of several shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub from_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsContent {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// Content of a campaign message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Email(EmailContent),
    Sms(SmsContent),
}

impl MessageContent {
    /// Decodes `value` by trying the email shape first, then SMS.
    ///
    /// Returns `None` when neither shape matches; no error is raised.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Ok(email) = EmailContent::deserialize(value) {
            return Some(MessageContent::Email(email));
        }
        if let Ok(sms) = SmsContent::deserialize(value) {
            return Some(MessageContent::Sms(sms));
        }
        None
    }

    /// Reads the `content` attribute of a `campaign-message` resource.
    pub fn from_resource(resource: &Resource) -> Option<Self> {
        resource.attributes.get("content").and_then(Self::from_value)
    }

    pub fn as_email(&self) -> Option<&EmailContent> {
        match self {
            MessageContent::Email(email) => Some(email),
            MessageContent::Sms(_) => None,
        }
    }

    pub fn as_sms(&self) -> Option<&SmsContent> {
        match self {
            MessageContent::Sms(sms) => Some(sms),
            MessageContent::Email(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_shape() {
        let content = MessageContent::from_value(&json!({
            "subject": "Spring sale",
            "preview_text": "Everything 20% off",
            "from_email": "store@example.com",
            "from_label": "Store"
        }))
        .unwrap();

        let email = content.as_email().unwrap();
        assert_eq!(email.subject, "Spring sale");
        assert_eq!(email.from_label.as_deref(), Some("Store"));
        assert!(content.as_sms().is_none());
    }

    #[test]
    fn test_sms_shape() {
        let content = MessageContent::from_value(&json!({
            "body": "Sale starts now",
            "media_url": null
        }))
        .unwrap();

        assert_eq!(content.as_sms().unwrap().body, "Sale starts now");
        assert!(content.as_email().is_none());
    }

    #[test]
    fn test_email_preferred_when_both_match() {
        let content = MessageContent::from_value(&json!({
            "subject": "Hi",
            "from_email": "a@example.com",
            "body": "also sms-like"
        }))
        .unwrap();
        assert!(content.as_email().is_some());
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(MessageContent::from_value(&json!({"unexpected": 1})), None);
        assert_eq!(MessageContent::from_value(&json!("text")), None);
        assert_eq!(MessageContent::from_value(&Value::Null), None);
    }

    #[test]
    fn test_from_resource() {
        let resource = Resource::new(
            "campaign-message",
            json!({"label": "SMS", "channel": "sms", "content": {"body": "Hello"}}),
        );
        let content = MessageContent::from_resource(&resource).unwrap();
        assert_eq!(content.as_sms().unwrap().body, "Hello");

        let empty = Resource::new("campaign-message", json!({"label": "x"}));
        assert_eq!(MessageContent::from_resource(&empty), None);
    }

    #[test]
    fn test_serialize_untagged() {
        let content = MessageContent::Sms(SmsContent {
            body: "Hi".to_string(),
            media_url: None,
        });
        assert_eq!(serde_json::to_value(&content).unwrap(), json!({"body": "Hi"}));
    }
}
