use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, Usage};

/// One candidate reply in a non-streaming completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The generated assistant message.
    pub message: ChatMessage,

    /// Why generation stopped, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Response body of a non-streaming `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    /// Server-assigned response id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The model that produced the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The candidate replies; servers return at least one on success.
    pub choices: Vec<CompletionChoice>,

    /// Token accounting for the exchange, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Returns the first choice's message content, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Consumes the response and returns the first choice's content, if any.
    pub fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_deserialization() {
        let json = json!({
            "id": "cmpl-1",
            "model": "qwen-7b",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        });

        let response: CompletionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.text(), Some("Hello!"));
        assert_eq!(response.usage.unwrap().total_tokens, 12);
    }

    #[test]
    fn response_without_optional_fields() {
        let json = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Hi"}
            }]
        });

        let response: CompletionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.into_text(), Some("Hi".to_string()));
    }

    #[test]
    fn response_with_no_choices() {
        let response: CompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.into_text(), None);
    }
}
