//! Message - outbound notification handed over by the event source

use serde::{Deserialize, Serialize};

use crate::Category;

/// Outbound notification
///
/// Immutable once enqueued. Either `title` or `body` may be empty, but not
/// both (checked at the producer edge, see [`Message::has_content`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Notification title
    #[serde(default)]
    pub title: String,

    /// Notification body
    #[serde(default, alias = "text")]
    pub body: String,

    /// Originating event category
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Explicit delivery channel. A message addressed to a channel belongs
    /// to that channel's deliverer and is never forwarded by this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Message {
    /// Create a message without category or channel
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category: None,
            channel: None,
        }
    }

    /// Attach a category tag
    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Address the message to an explicit channel
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// True if at least one of title/body is non-empty
    pub fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_content() {
        assert!(Message::new("Hello", "").has_content());
        assert!(Message::new("", "World").has_content());
        assert!(!Message::new("", "").has_content());
    }

    #[test]
    fn test_deserialize_event_payload() {
        let msg: Message =
            serde_json::from_str(r#"{"title":"Hello","text":"World","type":"Manual"}"#).unwrap();
        assert_eq!(msg.title, "Hello");
        assert_eq!(msg.body, "World");
        assert_eq!(msg.category.as_ref().map(Category::as_str), Some("manual"));
        assert!(msg.channel.is_none());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let msg: Message = serde_json::from_str(r#"{"body":"only body"}"#).unwrap();
        assert!(msg.title.is_empty());
        assert!(msg.has_content());
        assert!(msg.category.is_none());
    }

    #[test]
    fn test_builder() {
        let msg = Message::new("t", "b")
            .with_category("download")
            .with_channel("wechat");
        assert_eq!(msg.category, Some(Category::from("download")));
        assert_eq!(msg.channel.as_deref(), Some("wechat"));
    }
}
