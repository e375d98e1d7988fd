use async_trait::async_trait;

use iplens_types::Result;

use crate::{CallOptions, ChatMessage, NormalizedResult};

// ---------------------------------------------------------------------------
// ProviderAdapter
// ---------------------------------------------------------------------------

/// Translation layer between the normalized request contract and one
/// provider's wire format. Credential, model, and endpoint are resolved by the
/// dispatcher per call, so adapters stay stateless beyond their HTTP client.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    async fn call(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
        credential: &str,
        model: &str,
        endpoint_root: &str,
    ) -> Result<NormalizedResult>;

    /// The registry id this adapter serves.
    fn id(&self) -> &str;
}

// ---------------------------------------------------------------------------
// DynAdapter
// ---------------------------------------------------------------------------

pub struct DynAdapter(Box<dyn ProviderAdapter>);

impl DynAdapter {
    pub fn new(adapter: impl ProviderAdapter + 'static) -> Self {
        Self(Box::new(adapter))
    }

    pub async fn call(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
        credential: &str,
        model: &str,
        endpoint_root: &str,
    ) -> Result<NormalizedResult> {
        self.0
            .call(messages, options, credential, model, endpoint_root)
            .await
    }

    pub fn id(&self) -> &str {
        self.0.id()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
