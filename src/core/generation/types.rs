//! Wire types for the generation endpoint

use serde::{Deserialize, Serialize};

/// Inbound text-generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Prompt forwarded verbatim to the provider
    pub prompt: String,
    /// Completion token budget; bounds are not validated here, the provider
    /// rejects out-of-range values through the normal failure path
    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: u32,
    /// Sampling temperature, likewise passed through unvalidated
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Normalized generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Text of the first completion choice
    pub generated_text: String,
    /// Model name reported by the provider
    pub model: String,
    /// Token accounting reported by the provider
    pub usage: TokenUsage,
}

/// Token usage block, shared between the provider wire format and the
/// response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u64,
    /// Tokens produced by the completion
    pub completion_tokens: u64,
    /// Sum of the two
    pub total_tokens: u64,
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_apply() {
        let request: GenerationRequest = serde_json::from_str(r#"{"prompt": "Hello"}"#).unwrap();
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.max_tokens, 150);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_request_accepts_camel_case_alias() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"prompt": "Hello", "maxTokens": 50}"#).unwrap();
        assert_eq!(request.max_tokens, 50);
    }

    #[test]
    fn test_request_without_prompt_is_rejected() {
        let result = serde_json::from_str::<GenerationRequest>(r#"{"max_tokens": 50}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_result_serializes_expected_fields() {
        let result = GenerationResult {
            generated_text: "Hi".to_string(),
            model: "gemma2-9b-it".to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["generated_text"], "Hi");
        assert_eq!(json["model"], "gemma2-9b-it");
        assert_eq!(json["usage"]["total_tokens"], 15);
    }
}
