//! Shared error taxonomy for the IPLens AI provider gateway.
//!
//! Two kinds of failure cross the gateway boundary: configuration-integrity
//! errors (`NotConfigured`, `UnknownProvider`) that a caller must surface to a
//! human, and backend-reachability errors (`Transport`, `Parse`) that the
//! dispatcher absorbs into a synthesized fallback result.

/// Unified error type for all gateway subsystems.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway is not configured: set a provider and credential first")]
    NotConfigured,

    #[error("Provider '{provider}' is not present in the registry")]
    UnknownProvider { provider: String },

    #[error("Provider {provider} returned HTTP {status}: {message}")]
    Transport {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Failed to parse response from {provider}: {message}")]
    Parse { provider: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Returns `true` if the dispatcher should convert this error into a
    /// synthesized fallback result instead of propagating it.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport { .. } | GatewayError::Parse { .. } | GatewayError::Json(_)
        )
    }

    /// Returns `true` if the error must be surfaced to the caller as-is.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GatewayError::NotConfigured | GatewayError::UnknownProvider { .. }
        )
    }
}

/// A convenience alias for `Result<T, GatewayError>`.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_configured() {
        let err = GatewayError::NotConfigured;
        assert_eq!(
            err.to_string(),
            "Gateway is not configured: set a provider and credential first"
        );
    }

    #[test]
    fn error_display_unknown_provider() {
        let err = GatewayError::UnknownProvider {
            provider: "mistral".into(),
        };
        assert_eq!(
            err.to_string(),
            "Provider 'mistral' is not present in the registry"
        );
    }

    #[test]
    fn error_display_transport() {
        let err = GatewayError::Transport {
            provider: "openai".into(),
            status: 500,
            message: "internal server error".into(),
        };
        assert_eq!(
            err.to_string(),
            "Provider openai returned HTTP 500: internal server error"
        );
    }

    #[test]
    fn error_display_parse() {
        let err = GatewayError::Parse {
            provider: "anthropic".into(),
            message: "missing content block".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse response from anthropic: missing content block"
        );
    }

    // --- is_fallback_eligible ---

    #[test]
    fn transport_is_fallback_eligible() {
        let err = GatewayError::Transport {
            provider: "x".into(),
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_fallback_eligible());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn parse_is_fallback_eligible() {
        let err = GatewayError::Parse {
            provider: "x".into(),
            message: "bad body".into(),
        };
        assert!(err.is_fallback_eligible());
    }

    #[test]
    fn not_configured_is_not_fallback_eligible() {
        let err = GatewayError::NotConfigured;
        assert!(!err.is_fallback_eligible());
        assert!(err.is_configuration_error());
    }

    #[test]
    fn unknown_provider_is_configuration_error() {
        let err = GatewayError::UnknownProvider {
            provider: "x".into(),
        };
        assert!(!err.is_fallback_eligible());
        assert!(err.is_configuration_error());
    }

    // --- From impls ---

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GatewayError = io_err.into();
        assert!(matches!(err, GatewayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GatewayError = json_err.into();
        assert!(matches!(err, GatewayError::Json(_)));
        assert!(err.is_fallback_eligible());
    }

    // --- Result alias ---

    #[test]
    fn result_alias_works() {
        fn example() -> Result<u32> {
            Ok(42)
        }
        assert_eq!(example().unwrap(), 42);
    }
}
