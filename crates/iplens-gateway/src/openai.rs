use async_trait::async_trait;
use serde_json::json;

use crate::{CallOptions, ChatMessage, NormalizedResult, ProviderAdapter, Role, Usage};
use iplens_types::{GatewayError, Result};

// ---------------------------------------------------------------------------
// OpenAiAdapter
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct OpenAiAdapter {
    client: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Request translation (normalized → OpenAI chat completions JSON)
// ---------------------------------------------------------------------------

pub(crate) fn build_request_body(
    messages: &[ChatMessage],
    options: &CallOptions,
    model: &str,
) -> serde_json::Value {
    // Roles map one-to-one; system messages stay inline in the list.
    let messages: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| {
            json!({
                "role": match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": m.content,
            })
        })
        .collect();

    json!({
        "model": model,
        "messages": messages,
        "max_tokens": options.effective_max_output_tokens(),
        "temperature": options.effective_temperature(),
    })
}

// ---------------------------------------------------------------------------
// Response translation (chat completions JSON → NormalizedResult)
// ---------------------------------------------------------------------------

pub(crate) fn parse_response(
    provider: &str,
    body: &serde_json::Value,
    requested_model: &str,
) -> Result<NormalizedResult> {
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| GatewayError::Parse {
            provider: provider.to_string(),
            message: "response has no choices[0].message.content".into(),
        })?
        .to_string();

    let usage = parse_usage(&body["usage"]);
    let model_used = body["model"]
        .as_str()
        .unwrap_or(requested_model)
        .to_string();

    Ok(NormalizedResult {
        content,
        usage,
        model_used,
    })
}

fn parse_usage(usage: &serde_json::Value) -> Option<Usage> {
    let input_tokens = usage["prompt_tokens"].as_u64()?;
    let output_tokens = usage["completion_tokens"].as_u64().unwrap_or(0);
    let total_tokens = usage["total_tokens"]
        .as_u64()
        .unwrap_or(input_tokens + output_tokens);
    Some(Usage {
        input_tokens,
        output_tokens,
        total_tokens,
    })
}

pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
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
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                provider: "openai".into(),
                status: 0,
                message: e.to_string(),
            })?;

        let status = resp.status();
        let response_body = resp.text().await.map_err(|e| GatewayError::Transport {
            provider: "openai".into(),
            status: 0,
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Transport {
                provider: "openai".into(),
                status: status.as_u16(),
                message: extract_error_message(&response_body),
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&response_body).map_err(|e| GatewayError::Parse {
                provider: "openai".into(),
                message: format!("invalid response JSON: {e}"),
            })?;

        parse_response("openai", &json, model)
    }

    fn id(&self) -> &str {
        "openai"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
