use async_trait::async_trait;
use serde_json::json;

use crate::{CallOptions, ChatMessage, NormalizedResult, ProviderAdapter, Role, Usage};
use iplens_types::{GatewayError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// AnthropicAdapter
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AnthropicAdapter {
    client: reqwest::Client,
}

impl AnthropicAdapter {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for AnthropicAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Request translation (normalized → Anthropic JSON)
// ---------------------------------------------------------------------------

fn build_request_body(
    messages: &[ChatMessage],
    options: &CallOptions,
    model: &str,
) -> serde_json::Value {
    // Anthropic takes system text as a top-level field, not as a message. The
    // extraction happens here so the caller-facing contract stays uniform.
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let conversation: Vec<serde_json::Value> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| {
            json!({
                "role": match m.role {
                    Role::User => "user",
                    _ => "assistant",
                },
                "content": m.content,
            })
        })
        .collect();

    let mut body = json!({
        "model": model,
        "max_tokens": options.effective_max_output_tokens(),
        "temperature": options.effective_temperature(),
        "messages": conversation,
    });

    if !system.is_empty() {
        body["system"] = json!(system.join("\n\n"));
    }

    body
}

// ---------------------------------------------------------------------------
// Response translation (Anthropic JSON → NormalizedResult)
// ---------------------------------------------------------------------------

fn parse_response(body: &serde_json::Value, requested_model: &str) -> Result<NormalizedResult> {
    let content = body["content"]
        .as_array()
        .ok_or_else(|| GatewayError::Parse {
            provider: "anthropic".into(),
            message: "response has no content array".into(),
        })?;

    let text: String = content
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();

    let usage = parse_usage(&body["usage"]);
    let model_used = body["model"]
        .as_str()
        .unwrap_or(requested_model)
        .to_string();

    Ok(NormalizedResult {
        content: text,
        usage,
        model_used,
    })
}

fn parse_usage(usage: &serde_json::Value) -> Option<Usage> {
    let input_tokens = usage["input_tokens"].as_u64()?;
    let output_tokens = usage["output_tokens"].as_u64().unwrap_or(0);
    Some(Usage {
        input_tokens,
        output_tokens,
        total_tokens: input_tokens + output_tokens,
    })
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn map_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
    GatewayError::Transport {
        provider: "anthropic".into(),
        status: status.as_u16(),
        message: extract_error_message(body),
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
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
            .post(format!("{}/v1/messages", endpoint_root))
            .header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                provider: "anthropic".into(),
                status: 0,
                message: e.to_string(),
            })?;

        let status = resp.status();
        let response_body = resp.text().await.map_err(|e| GatewayError::Transport {
            provider: "anthropic".into(),
            status: 0,
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(map_error(status, &response_body));
        }

        let json: serde_json::Value =
            serde_json::from_str(&response_body).map_err(|e| GatewayError::Parse {
                provider: "anthropic".into(),
                message: format!("invalid response JSON: {e}"),
            })?;

        parse_response(&json, model)
    }

    fn id(&self) -> &str {
        "anthropic"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
