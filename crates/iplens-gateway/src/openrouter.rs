use async_trait::async_trait;

use crate::openai::{build_request_body, extract_error_message, parse_response};
use crate::{CallOptions, ChatMessage, NormalizedResult, ProviderAdapter};
use iplens_types::{GatewayError, Result};

// OpenRouter asks clients to identify themselves via attribution headers.
const REFERER: &str = "https://iplens.app";
const TITLE: &str = "IPLens";

// ---------------------------------------------------------------------------
// OpenRouterAdapter
// ---------------------------------------------------------------------------

/// OpenRouter speaks the OpenAI chat-completions dialect; only the endpoint
/// and auth headers differ, so the body translation is shared with
/// [`crate::OpenAiAdapter`].
#[derive(Debug)]
pub struct OpenRouterAdapter {
    client: reqwest::Client,
}

impl OpenRouterAdapter {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OpenRouterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterAdapter {
    async fn call(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
        credential: &str,
        model: &str,
        endpoint_root: &str,
    ) -> Result<NormalizedResult> {
        let body = build_request_body(messages, options, model);

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", endpoint_root))
            .header("Authorization", format!("Bearer {}", credential))
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                provider: "openrouter".into(),
                status: 0,
                message: e.to_string(),
            })?;

        let status = resp.status();
        let response_body = resp.text().await.map_err(|e| GatewayError::Transport {
            provider: "openrouter".into(),
            status: 0,
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Transport {
                provider: "openrouter".into(),
                status: status.as_u16(),
                message: extract_error_message(&response_body),
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&response_body).map_err(|e| GatewayError::Parse {
                provider: "openrouter".into(),
                message: format!("invalid response JSON: {e}"),
            })?;

        parse_response("openrouter", &json, model)
    }

    fn id(&self) -> &str {
        "openrouter"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
