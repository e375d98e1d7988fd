use std::collections::HashMap;
use std::sync::Arc;

use iplens_types::{GatewayError, Result};

use crate::{
    fallback, registry, AnthropicAdapter, CallOptions, ChatMessage, ConfigStore, DynAdapter,
    NormalizedResult, OpenAiAdapter, OpenRouterAdapter, ProviderAdapter, Role,
};

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes a normalized request to the adapter matching the active
/// configuration. Backend failures never cross this boundary: a failing
/// adapter call degrades to a synthesized fallback result, while the two
/// configuration-integrity errors propagate to the caller.
pub struct Dispatcher {
    store: Arc<ConfigStore>,
    adapters: HashMap<String, DynAdapter>,
}

impl Dispatcher {
    /// A dispatcher with no adapters registered. Tests use this to substitute
    /// mocks; production code wants [`Dispatcher::with_default_adapters`].
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            adapters: HashMap::new(),
        }
    }

    /// A dispatcher with one real adapter per registry entry.
    pub fn with_default_adapters(store: Arc<ConfigStore>) -> Self {
        let mut dispatcher = Self::new(store);
        dispatcher.register_adapter(AnthropicAdapter::new());
        dispatcher.register_adapter(OpenAiAdapter::new());
        dispatcher.register_adapter(OpenRouterAdapter::new());
        dispatcher
    }

    pub fn register_adapter(&mut self, adapter: impl ProviderAdapter + 'static) {
        let id = adapter.id().to_string();
        self.adapters.insert(id, DynAdapter::new(adapter));
    }

    pub fn config(&self) -> &ConfigStore {
        &self.store
    }

    /// Perform one provider call. Single attempt, no retry; on any adapter
    /// failure the fallback synthesizer answers instead.
    pub async fn dispatch(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> Result<NormalizedResult> {
        let config = self.store.current();
        if !config.is_usable() {
            return Err(GatewayError::NotConfigured);
        }

        let descriptor =
            registry::describe(&config.provider_id).ok_or_else(|| GatewayError::UnknownProvider {
                provider: config.provider_id.clone(),
            })?;

        let adapter =
            self.adapters
                .get(descriptor.id)
                .ok_or_else(|| GatewayError::UnknownProvider {
                    provider: config.provider_id.clone(),
                })?;

        let model = options
            .model
            .as_deref()
            .or(config.model.as_deref())
            .unwrap_or(descriptor.default_model());
        let endpoint_root = config
            .endpoint_override
            .as_deref()
            .unwrap_or(descriptor.endpoint_root);
        let credential = config.credential.as_deref().unwrap_or_default();

        tracing::info!(
            provider = descriptor.id,
            model,
            messages = messages.len(),
            "dispatching AI request"
        );

        match adapter
            .call(messages, options, credential, model, endpoint_root)
            .await
        {
            Ok(result) => {
                tracing::info!(
                    provider = descriptor.id,
                    model = %result.model_used,
                    tokens = result.usage.map(|u| u.total_tokens),
                    "AI request completed"
                );
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(
                    provider = descriptor.id,
                    error = %err,
                    "provider call failed; serving synthesized fallback"
                );
                Ok(fallback::synthesize(last_user_content(messages)))
            }
        }
    }
}

fn last_user_content(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigPatch;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoAdapter {
        id: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderAdapter for EchoAdapter {
        async fn call(
            &self,
            _messages: &[ChatMessage],
            _options: &CallOptions,
            credential: &str,
            model: &str,
            endpoint_root: &str,
        ) -> Result<NormalizedResult> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(NormalizedResult {
                content: format!("{endpoint_root} via {credential}"),
                usage: None,
                model_used: model.to_string(),
            })
        }

        fn id(&self) -> &str {
            self.id
        }
    }

    struct FailingAdapter {
        id: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderAdapter for FailingAdapter {
        async fn call(
            &self,
            _messages: &[ChatMessage],
            _options: &CallOptions,
            _credential: &str,
            _model: &str,
            _endpoint_root: &str,
        ) -> Result<NormalizedResult> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Err(GatewayError::Transport {
                provider: self.id.into(),
                status: 503,
                message: "service unavailable".into(),
            })
        }

        fn id(&self) -> &str {
            self.id
        }
    }

    fn store_with(dir: &tempfile::TempDir, patch: Option<ConfigPatch>) -> Arc<ConfigStore> {
        let store = Arc::new(ConfigStore::at_path(dir.path().join("gateway.json")));
        if let Some(patch) = patch {
            store.save(patch).unwrap();
        }
        store
    }

    fn usable_patch(provider: &str) -> ConfigPatch {
        ConfigPatch::default().provider(provider).credential("sk-test")
    }

    #[tokio::test]
    async fn unusable_config_fails_with_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, None);
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(store);
        dispatcher.register_adapter(EchoAdapter {
            id: "anthropic",
            calls: calls.clone(),
        });

        let err = dispatcher
            .dispatch(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
        // The adapter was never reached.
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn unknown_provider_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, Some(usable_patch("legacy-llm")));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(store);
        dispatcher.register_adapter(EchoAdapter {
            id: "anthropic",
            calls: calls.clone(),
        });

        let err = dispatcher
            .dispatch(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UnknownProvider { ref provider } if provider == "legacy-llm"
        ));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn successful_call_returns_adapter_result_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, Some(usable_patch("anthropic")));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(store);
        dispatcher.register_adapter(EchoAdapter {
            id: "anthropic",
            calls: calls.clone(),
        });

        let result = dispatcher
            .dispatch(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result.content, "https://api.anthropic.com via sk-test");
        assert_eq!(result.model_used, "claude-sonnet-4-5-20250929");
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn failing_adapter_degrades_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, Some(usable_patch("openai")));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(store);
        dispatcher.register_adapter(FailingAdapter {
            id: "openai",
            calls: calls.clone(),
        });

        let result = dispatcher
            .dispatch(
                &[
                    ChatMessage::system("persona"),
                    ChatMessage::user("analyze the opportunity gaps here"),
                ],
                &CallOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.model_used, fallback::FALLBACK_MODEL);
        assert!(result.content.to_lowercase().contains("opportunity"));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn model_resolution_prefers_options_then_config_then_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, Some(usable_patch("openai")));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(store.clone());
        dispatcher.register_adapter(EchoAdapter {
            id: "openai",
            calls,
        });
        let messages = [ChatMessage::user("hi")];

        // No model anywhere: first supported model of the descriptor.
        let result = dispatcher
            .dispatch(&messages, &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result.model_used, "gpt-4o");

        // Configured default model.
        store
            .save(ConfigPatch::default().model("gpt-4o-mini"))
            .unwrap();
        let result = dispatcher
            .dispatch(&messages, &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result.model_used, "gpt-4o-mini");

        // Per-call override wins over everything.
        let options = CallOptions {
            model: Some("o3-mini".into()),
            ..CallOptions::default()
        };
        let result = dispatcher.dispatch(&messages, &options).await.unwrap();
        assert_eq!(result.model_used, "o3-mini");
    }

    #[tokio::test]
    async fn endpoint_override_replaces_registry_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            &dir,
            Some(usable_patch("anthropic").endpoint_override("http://localhost:8080")),
        );
        let mut dispatcher = Dispatcher::new(store);
        dispatcher.register_adapter(EchoAdapter {
            id: "anthropic",
            calls: Arc::new(AtomicUsize::new(0)),
        });

        let result = dispatcher
            .dispatch(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap();
        assert!(result.content.starts_with("http://localhost:8080"));
    }

    #[tokio::test]
    async fn fallback_uses_last_user_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, Some(usable_patch("anthropic")));
        let mut dispatcher = Dispatcher::new(store);
        dispatcher.register_adapter(FailingAdapter {
            id: "anthropic",
            calls: Arc::new(AtomicUsize::new(0)),
        });

        // The trajectory keyword lives in the last user message only.
        let result = dispatcher
            .dispatch(
                &[
                    ChatMessage::user("analyze claims"),
                    ChatMessage::assistant("done"),
                    ChatMessage::user("now predict the trajectory"),
                ],
                &CallOptions::default(),
            )
            .await
            .unwrap();
        assert!(result.content.contains("Trajectory"));
    }

    #[test]
    fn default_adapters_cover_the_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, None);
        let dispatcher = Dispatcher::with_default_adapters(store);
        for provider in registry::all() {
            assert!(
                dispatcher.adapters.contains_key(provider.id),
                "missing adapter for {}",
                provider.id
            );
        }
    }
}
