use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

/// Sentinel model name understood by servers that load a single model.
pub const DEFAULT_MODEL: &str = "default";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default cap on generated tokens per response.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Parameters for a chat completion request.
///
/// Serializes to the body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// The model to generate with.
    pub model: String,

    /// The full conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Cap on generated tokens.
    pub max_tokens: u32,

    /// Whether the response should be streamed as server-sent events.
    pub stream: bool,
}

impl CompletionRequest {
    /// Create a new request for the given messages with default sampling
    /// parameters and streaming disabled.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: false,
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the generated-token cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Enables streaming mode.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_serialization() {
        // 0.5 survives the f32-to-f64 conversion exactly.
        let request = CompletionRequest::new(DEFAULT_MODEL, vec![ChatMessage::user("Hi")])
            .with_temperature(0.5);
        let json = to_value(&request).unwrap();

        assert_eq!(
            json,
            json!({
                "model": "default",
                "messages": [{"role": "user", "content": "Hi"}],
                "temperature": 0.5,
                "max_tokens": 1000,
                "stream": false
            })
        );
    }

    #[test]
    fn request_builders() {
        let request = CompletionRequest::new("qwen-7b", vec![])
            .with_temperature(0.2)
            .with_max_tokens(64)
            .streaming();

        assert_eq!(request.model, "qwen-7b");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 64);
        assert!(request.stream);
    }
}
