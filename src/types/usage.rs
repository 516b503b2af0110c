use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Token accounting reported by the server for one exchange.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt (the submitted transcript).
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens generated for the reply.
    #[serde(default)]
    pub completion_tokens: u64,

    /// Prompt plus completion tokens.
    #[serde(default)]
    pub total_tokens: u64,
}

impl Usage {
    /// Create a new `Usage`.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_accumulates() {
        let total = Usage::new(10, 5) + Usage::new(7, 3);
        assert_eq!(total.prompt_tokens, 17);
        assert_eq!(total.completion_tokens, 8);
        assert_eq!(total.total_tokens, 25);
    }

    #[test]
    fn usage_deserializes_with_missing_fields() {
        let usage: Usage = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(usage, Usage::default());
    }
}
