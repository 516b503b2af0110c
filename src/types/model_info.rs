use serde::{Deserialize, Serialize};

/// One model advertised by the list models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier to pass as the `model` request field.
    pub id: String,

    /// Object tag, `"model"` on conforming servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Creation time as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Owner reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
}

impl ModelInfo {
    /// Create a new `ModelInfo` carrying only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: None,
            created: None,
            owned_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_info_deserialization() {
        let json = json!({
            "id": "qwen-7b",
            "object": "model",
            "created": 1717027200,
            "owned_by": "vllm"
        });

        let info: ModelInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.id, "qwen-7b");
        assert_eq!(info.object.as_deref(), Some("model"));
        assert_eq!(info.created, Some(1717027200));
    }

    #[test]
    fn model_info_id_only() {
        let info: ModelInfo = serde_json::from_value(json!({"id": "m"})).unwrap();
        assert_eq!(info, ModelInfo::new("m"));
    }
}
