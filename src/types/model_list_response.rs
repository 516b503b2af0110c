use serde::{Deserialize, Serialize};

use crate::types::ModelInfo;

/// Response from the list models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelListResponse {
    /// Object tag, `"list"` on conforming servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// List of models returned by the server.
    pub data: Vec<ModelInfo>,
}

impl ModelListResponse {
    /// Create a new `ModelListResponse`.
    pub fn new(data: Vec<ModelInfo>) -> Self {
        Self { object: None, data }
    }

    /// Get the list of models.
    pub fn models(&self) -> &[ModelInfo] {
        &self.data
    }

    /// Collect the advertised model identifiers.
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|m| m.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_list_deserialization() {
        let json = json!({
            "object": "list",
            "data": [
                {"id": "qwen-7b", "object": "model"},
                {"id": "llama-3-8b", "object": "model"}
            ]
        });

        let response: ModelListResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.models().len(), 2);
        assert_eq!(response.ids(), vec!["qwen-7b", "llama-3-8b"]);
    }

    #[test]
    fn model_list_empty() {
        let response: ModelListResponse =
            serde_json::from_value(json!({"data": []})).unwrap();
        assert!(response.ids().is_empty());
    }
}
