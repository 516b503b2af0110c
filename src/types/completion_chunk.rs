use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Incremental content carried by one streamed event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkDelta {
    /// Role announcement, sent on the first chunk of a reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// The text fragment, absent on role-only and finish chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One candidate's delta in a streamed completion event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The incremental payload.
    #[serde(default)]
    pub delta: ChunkDelta,

    /// Why generation stopped, set on the final content chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Body of one `data:` event in a streaming completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChunk {
    /// Server-assigned response id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The model that produced the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The per-choice deltas.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl CompletionChunk {
    /// Returns the first choice's non-empty content fragment, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chunk_with_content() {
        let chunk: CompletionChunk = serde_json::from_value(json!({
            "choices": [{"index": 0, "delta": {"content": "Hel"}}]
        }))
        .unwrap();
        assert_eq!(chunk.content(), Some("Hel"));
    }

    #[test]
    fn role_only_chunk_has_no_content() {
        let chunk: CompletionChunk = serde_json::from_value(json!({
            "choices": [{"delta": {"role": "assistant"}}]
        }))
        .unwrap();
        assert_eq!(chunk.content(), None);
    }

    #[test]
    fn empty_fragment_is_filtered() {
        let chunk: CompletionChunk = serde_json::from_value(json!({
            "choices": [{"delta": {"content": ""}}]
        }))
        .unwrap();
        assert_eq!(chunk.content(), None);
    }

    #[test]
    fn finish_chunk_without_delta_content() {
        let chunk: CompletionChunk = serde_json::from_value(json!({
            "choices": [{"delta": {}, "finish_reason": "stop"}]
        }))
        .unwrap();
        assert_eq!(chunk.content(), None);
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn chunk_without_choices() {
        let chunk: CompletionChunk = serde_json::from_value(json!({})).unwrap();
        assert_eq!(chunk.content(), None);
    }
}
