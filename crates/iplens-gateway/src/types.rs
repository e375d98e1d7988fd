use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CallOptions
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Per-call overrides of the configured defaults. Fields left `None` fall back
/// to the active configuration and then to the gateway defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOptions {
    pub model: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CallOptions {
    pub fn effective_max_output_tokens(&self) -> u32 {
        self.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
    }

    pub fn effective_temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

// ---------------------------------------------------------------------------
// NormalizedResult
// ---------------------------------------------------------------------------

/// The single result shape every adapter and the fallback synthesizer produce.
/// Callers never see a provider-specific response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub content: String,
    /// `None` when the provider reports no usage, never a zeroed struct.
    pub usage: Option<Usage>,
    pub model_used: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors() {
        let msg = ChatMessage::system("You are helpful.");
        assert_eq!(msg.role, Role::System);
        assert_eq!(msg.content, "You are helpful.");

        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);

        let msg = ChatMessage::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );

        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Assistant);
    }

    #[test]
    fn call_options_defaults() {
        let opts = CallOptions::default();
        assert!(opts.model.is_none());
        assert_eq!(opts.effective_max_output_tokens(), 4000);
        assert_eq!(opts.effective_temperature(), 0.7);
    }

    #[test]
    fn call_options_overrides_win() {
        let opts = CallOptions {
            model: Some("gpt-4o".into()),
            max_output_tokens: Some(256),
            temperature: Some(0.1),
        };
        assert_eq!(opts.effective_max_output_tokens(), 256);
        assert_eq!(opts.effective_temperature(), 0.1);
    }

    #[test]
    fn normalized_result_round_trip() {
        let result = NormalizedResult {
            content: "Hello!".into(),
            usage: Some(Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            }),
            model_used: "claude-sonnet-4-5-20250929".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: NormalizedResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn normalized_result_without_usage() {
        let result = NormalizedResult {
            content: "no usage reported".into(),
            usage: None,
            model_used: "gpt-4o".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["usage"].is_null());
    }
}
