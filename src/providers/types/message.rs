use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::content::Content;

/// Role tag of a conversation turn, from the fixed set the remote API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation: a role plus an ordered list of content parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub id: String,
    pub created: i64,
    pub content: Vec<Content>,
}

fn create_message_id() -> String {
    format!("msg_{}", Uuid::new_v4().simple())
}

impl Message {
    pub fn new(role: Role, content: Vec<Content>) -> Result<Self> {
        if content.is_empty() {
            return Err(anyhow!("message must include at least one content part"));
        }
        Ok(Self {
            role,
            id: create_message_id(),
            created: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0) as i64,
            content,
        })
    }

    pub fn system(text: &str) -> Self {
        Self::single(Role::System, text)
    }

    pub fn user(text: &str) -> Self {
        Self::single(Role::User, text)
    }

    pub fn assistant(text: &str) -> Self {
        Self::single(Role::Assistant, text)
    }

    fn single(role: Role, text: &str) -> Self {
        Self {
            role,
            id: create_message_id(),
            created: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0) as i64,
            content: vec![Content::text(text)],
        }
    }

    /// Concatenated text of all text content parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|content| match content {
                Content::Text(text) => text.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_system_message() {
        let message = Message::system("be helpful");
        assert_eq!(message.role, Role::System);
        assert_eq!(message.text(), "be helpful");
    }

    #[test]
    fn test_user_message() {
        let message = Message::user("abcd");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "abcd");
    }

    #[test]
    fn test_assistant_message() {
        let message = Message::assistant("abcd");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text(), "abcd");
    }

    #[test]
    fn test_empty_content_rejected() {
        let result = Message::new(Role::User, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_multiple_text_parts() -> Result<()> {
        let message = Message::new(
            Role::Assistant,
            vec![Content::text("one"), Content::text("two")],
        )?;
        assert_eq!(message.text(), "one\ntwo");
        Ok(())
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Message::user("x");
        let b = Message::user("x");
        assert!(a.id.starts_with("msg_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialization() -> Result<()> {
        let message = Message::user("Hello, world!");
        let serialized = serde_json::to_string(&message)?;
        let deserialized: Message = serde_json::from_str(&serialized)?;
        assert_eq!(message.text(), deserialized.text());
        assert_eq!(deserialized.role, Role::User);

        let json_value: Value = serde_json::from_str(&serialized)?;
        assert_eq!(json_value["role"], "user");
        assert!(json_value.get("id").is_some());
        assert!(json_value.get("created").is_some());
        assert!(json_value.get("content").is_some());
        Ok(())
    }
}
