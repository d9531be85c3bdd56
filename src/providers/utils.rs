use serde_json::{json, Value};

use super::types::{content::Content, message::Message};
use crate::errors::ProviderError;

/// Convert internal messages to the chat-completions message specification.
/// Content stays in typed-parts form (`[{"type": "text", "text": ...}]`).
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let parts: Vec<Value> = message
                .content
                .iter()
                .map(|content| match content {
                    Content::Text(text) => json!({"type": "text", "text": text.text}),
                })
                .collect();
            json!({
                "role": message.role,
                "content": parts,
            })
        })
        .collect()
}

/// Convert the chat-completions response body to an internal assistant message,
/// taking the top choice's text.
pub fn openai_response_to_message(response: &Value) -> Result<Message, ProviderError> {
    let text = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            ProviderError::Response(format!("no text content in top choice: {}", response))
        })?;
    Ok(Message::assistant(text))
}

pub fn check_openai_context_length_error(error: &Value) -> Option<ProviderError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ProviderError::ContextLengthExceeded(message))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::message::Role;

    #[test]
    fn test_messages_to_openai_spec() {
        let messages = vec![
            Message::system("be terse"),
            Message::user("Hello"),
            Message::assistant("Hi there"),
        ];
        let spec = messages_to_openai_spec(&messages);

        assert_eq!(spec.len(), 3);
        assert_eq!(spec[0]["role"], "system");
        assert_eq!(spec[0]["content"][0]["type"], "text");
        assert_eq!(spec[0]["content"][0]["text"], "be terse");
        assert_eq!(spec[1]["role"], "user");
        assert_eq!(spec[1]["content"][0]["text"], "Hello");
        assert_eq!(spec[2]["role"], "assistant");
        assert_eq!(spec[2]["content"][0]["text"], "Hi there");
    }

    #[test]
    fn test_spec_omits_internal_fields() {
        let spec = messages_to_openai_spec(&[Message::user("x")]);
        assert!(spec[0].get("id").is_none());
        assert!(spec[0].get("created").is_none());
    }

    #[test]
    fn test_openai_response_to_message_text() {
        let response = json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello from the model"
                }
            }]
        });

        let message = openai_response_to_message(&response).unwrap();
        assert_eq!(message.text(), "Hello from the model");
        assert_eq!(message.role, Role::Assistant);
    }

    #[test]
    fn test_openai_response_missing_content() {
        let response = json!({"choices": []});
        let result = openai_response_to_message(&response);
        assert!(matches!(result, Err(ProviderError::Response(_))));
    }

    #[test]
    fn test_check_openai_context_length_error() {
        let error = json!({
            "code": "context_length_exceeded",
            "message": "This message is too long"
        });

        let result = check_openai_context_length_error(&error);
        assert!(matches!(
            result,
            Some(ProviderError::ContextLengthExceeded(_))
        ));

        let error = json!({
            "code": "other_error",
            "message": "Some other error"
        });

        assert!(check_openai_context_length_error(&error).is_none());
    }
}
