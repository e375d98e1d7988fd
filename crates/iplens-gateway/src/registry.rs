//! Static catalogue of known backend providers.
//!
//! Registry membership is the single authority for "known provider": the
//! dispatcher and configuration store consult it instead of hard-coding
//! provider names.

use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// ProviderDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub endpoint_root: &'static str,
    /// Supported model identifiers, most capable first. The first entry is the
    /// default when neither the call nor the configuration names a model.
    pub supported_models: &'static [&'static str],
    pub requires_credential: bool,
}

impl ProviderDescriptor {
    pub fn default_model(&self) -> &'static str {
        self.supported_models[0]
    }
}

static REGISTRY: LazyLock<Vec<ProviderDescriptor>> = LazyLock::new(|| {
    vec![
        ProviderDescriptor {
            id: "anthropic",
            display_name: "Anthropic",
            endpoint_root: "https://api.anthropic.com",
            supported_models: &[
                "claude-sonnet-4-5-20250929",
                "claude-opus-4-1",
                "claude-haiku-4-5-20251001",
            ],
            requires_credential: true,
        },
        ProviderDescriptor {
            id: "openai",
            display_name: "OpenAI",
            endpoint_root: "https://api.openai.com",
            supported_models: &["gpt-4o", "gpt-4o-mini", "o3-mini"],
            requires_credential: true,
        },
        ProviderDescriptor {
            id: "openrouter",
            display_name: "OpenRouter",
            endpoint_root: "https://openrouter.ai/api",
            supported_models: &[
                "anthropic/claude-sonnet-4.5",
                "openai/gpt-4o",
                "meta-llama/llama-3.3-70b-instruct",
            ],
            requires_credential: true,
        },
    ]
});

/// All known providers, in presentation order.
pub fn all() -> &'static [ProviderDescriptor] {
    &REGISTRY
}

/// Look up one provider by id.
pub fn describe(provider_id: &str) -> Option<&'static ProviderDescriptor> {
    REGISTRY.iter().find(|p| p.id == provider_id)
}

/// The provider used when no configuration has ever been saved.
pub fn default_provider() -> &'static ProviderDescriptor {
    &REGISTRY[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
