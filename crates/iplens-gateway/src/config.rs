//! Persisted gateway configuration: active provider, credential, and default
//! model.
//!
//! The store owns the only mutable state in the gateway. Reads are served from
//! memory; `save` merges a partial update and persists atomically so no reader
//! ever observes a half-merged configuration.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use iplens_types::Result;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::registry;

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// The one persisted record. Serialized with camelCase keys under a single
/// well-known file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub provider_id: String,
    pub credential: Option<String>,
    pub model: Option<String>,
    pub endpoint_override: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider_id: registry::default_provider().id.to_string(),
            credential: None,
            model: None,
            endpoint_override: None,
        }
    }
}

impl GatewayConfig {
    /// A configuration is usable only with a non-empty provider id and a
    /// non-empty credential. The credential is required for every provider,
    /// matching the registry where no entry allows unauthenticated calls.
    pub fn is_usable(&self) -> bool {
        !self.provider_id.is_empty()
            && self
                .credential
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// ConfigPatch
// ---------------------------------------------------------------------------

/// Shallow-merge update for [`ConfigStore::save`]. `None` fields retain the
/// prior value.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub provider_id: Option<String>,
    pub credential: Option<String>,
    pub model: Option<String>,
    pub endpoint_override: Option<String>,
}

impl ConfigPatch {
    pub fn provider(mut self, id: impl Into<String>) -> Self {
        self.provider_id = Some(id.into());
        self
    }

    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn endpoint_override(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    fn apply(self, config: &mut GatewayConfig) {
        if let Some(provider_id) = self.provider_id {
            config.provider_id = provider_id;
        }
        if let Some(credential) = self.credential {
            config.credential = Some(credential);
        }
        if let Some(model) = self.model {
            config.model = Some(model);
        }
        if let Some(endpoint) = self.endpoint_override {
            config.endpoint_override = Some(endpoint);
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<GatewayConfig>,
}

impl ConfigStore {
    /// Open the store at the default location (`~/.iplens/gateway.json`),
    /// loading the persisted configuration if present.
    pub fn open() -> Self {
        Self::at_path(default_config_path())
    }

    /// Open the store at an explicit path. Used by tests and hosts that manage
    /// their own data directory.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = read_config(&path);
        Self {
            path,
            current: RwLock::new(config),
        }
    }

    /// Re-read the persisted configuration, replacing the in-memory value.
    /// Absent or malformed data yields the default configuration; it is never
    /// an error.
    pub fn load(&self) -> GatewayConfig {
        let config = read_config(&self.path);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = config.clone();
        config
    }

    /// The in-memory configuration, without touching storage.
    pub fn current(&self) -> GatewayConfig {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_usable(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_usable()
    }

    /// Merge `patch` over the current configuration and persist the result.
    /// The in-memory update happens in one write-lock section, so concurrent
    /// dispatches see either the old or the new configuration, never a mix.
    pub fn save(&self, patch: ConfigPatch) -> Result<GatewayConfig> {
        let merged = {
            let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
            patch.apply(&mut guard);
            guard.clone()
        };
        write_config(&self.path, &merged)?;
        tracing::info!(provider = %merged.provider_id, "gateway configuration saved");
        Ok(merged)
    }

    /// Reset to the default configuration and remove the persisted record.
    pub fn clear(&self) -> Result<()> {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = GatewayConfig::default();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".iplens")
        .join("gateway.json")
}

fn read_config(path: &Path) -> GatewayConfig {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to read gateway configuration; using defaults");
            }
            return GatewayConfig::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed gateway configuration; using defaults");
            GatewayConfig::default()
        }
    }
}

fn write_config(path: &Path, config: &GatewayConfig) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    // Write-then-rename so a crash mid-write cannot corrupt the record.
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(serde_json::to_string_pretty(config)?.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
