//! Unified AI provider gateway with multi-backend support (Anthropic, OpenAI,
//! OpenRouter).
//!
//! One stable call surface over interchangeable LLM backends: a static
//! provider registry, a persisted configuration store, per-provider wire
//! adapters, a dispatcher that degrades to deterministic fallback synthesis
//! when no real call can succeed, and a library of task-specific request
//! builders for patent analysis work.

mod adapter;
mod anthropic;
mod config;
mod dispatch;
pub mod fallback;
mod openai;
mod openrouter;
pub mod registry;
pub mod tasks;
mod types;

pub use adapter::{DynAdapter, ProviderAdapter};
pub use anthropic::AnthropicAdapter;
pub use config::{ConfigPatch, ConfigStore, GatewayConfig};
pub use dispatch::Dispatcher;
pub use openai::OpenAiAdapter;
pub use openrouter::OpenRouterAdapter;
pub use registry::ProviderDescriptor;
pub use types::*;

pub use iplens_types::{GatewayError, Result};
