// AI configuration and key resolution
//
// API keys come from environment variables (MATRIXLAB_GEMINI_KEY, etc.)
// and are NEVER stored in settings.json or printed by diagnostics.

use std::env;

/// Source of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Key retrieved from environment variable
    Environment,
    /// No key found
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Get the environment variable name for a provider
pub fn env_var_name(provider: &str) -> String {
    format!("MATRIXLAB_{}_KEY", provider.to_uppercase())
}

/// Get an API key for the specified provider from the environment
pub fn get_api_key(provider: &str) -> KeyLookup {
    let env_name = env_var_name(provider);
    if let Ok(key) = env::var(&env_name) {
        if !key.is_empty() {
            return KeyLookup {
                key: Some(key),
                source: KeySource::Environment,
            };
        }
    }

    KeyLookup {
        key: None,
        source: KeySource::None,
    }
}

// ============================================================================
// Resolved AI Configuration (single source of truth)
// ============================================================================

/// The effective AI configuration, fully resolved from all sources.
/// This is the single source of truth for runtime AI behavior.
#[derive(Debug, Clone)]
pub struct ResolvedAiConfig {
    /// Effective provider (None, Gemini, OpenAI, Anthropic)
    pub provider: crate::settings::AiProvider,
    /// Effective model (resolved from settings or provider default)
    pub model: String,
    /// Effective API base URL
    pub endpoint: String,
    /// API key (if available and provider needs one)
    pub api_key: Option<String>,
    /// Source of the API key
    pub key_source: KeySource,
    /// Overall status
    pub status: AiConfigStatus,
    /// Human-readable reason if not ready
    pub blocking_reason: Option<String>,
}

/// Status of the AI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiConfigStatus {
    /// AI is disabled (provider = none)
    Disabled,
    /// Configuration is valid and the insight call is wired up
    Ready,
    /// Configuration is valid but provider not yet implemented
    NotImplemented,
    /// Provider is configured but API key is missing
    MissingKey,
}

impl AiConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Ready => "ready",
            Self::NotImplemented => "not_implemented",
            Self::MissingKey => "missing_key",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if configuration is valid (key present if needed)
    /// but the provider may not be implemented yet
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Ready | Self::NotImplemented)
    }
}

impl ResolvedAiConfig {
    /// Resolve the effective AI configuration from settings.
    /// This is the single entry point for all AI config resolution.
    pub fn from_settings(settings: &crate::settings::AiSettings) -> Self {
        let provider = settings.provider;

        // If disabled, return early
        if !provider.is_enabled() {
            return Self {
                provider,
                model: String::new(),
                endpoint: String::new(),
                api_key: None,
                key_source: KeySource::None,
                status: AiConfigStatus::Disabled,
                blocking_reason: None,
            };
        }

        let model = settings.effective_model().to_string();
        let endpoint = settings.effective_endpoint().to_string();

        // Get API key if needed
        let (api_key, key_source, key_status, key_reason) = if provider.needs_api_key() {
            let lookup = get_api_key(provider.name());
            match lookup.key {
                Some(key) => (Some(key), lookup.source, None, None),
                None => (
                    None,
                    KeySource::None,
                    Some(AiConfigStatus::MissingKey),
                    Some(format!(
                        "No API key found. Set {}",
                        env_var_name(provider.name())
                    )),
                ),
            }
        } else {
            (None, KeySource::None, None, None)
        };

        // A missing key blocks before implementation status does.
        let (status, blocking_reason) = if let Some(s) = key_status {
            (s, key_reason)
        } else if !provider.is_implemented() {
            (
                AiConfigStatus::NotImplemented,
                Some(format!(
                    "Provider {} is configured but not yet implemented",
                    provider.name()
                )),
            )
        } else {
            (AiConfigStatus::Ready, None)
        };

        Self {
            provider,
            model,
            endpoint,
            api_key,
            key_source,
            status,
            blocking_reason,
        }
    }

    /// Load settings and resolve in one call (convenience method)
    pub fn load() -> Self {
        let settings = crate::settings::Settings::load();
        Self::from_settings(&settings.ai)
    }

    /// Provider display name
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

// ============================================================================
// Configuration Validation
// ============================================================================

/// Result of configuration validation
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Configuration is valid
    Valid(String),
    /// Configuration has issues
    Invalid(String),
    /// Validation was skipped (AI disabled)
    Skipped(String),
}

impl ValidationResult {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid(msg) => msg,
            Self::Invalid(msg) => msg,
            Self::Skipped(msg) => msg,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl ResolvedAiConfig {
    /// Validate the AI configuration.
    /// This checks credentials, NOT feature functionality; the first real
    /// request is the actual API validation.
    pub fn validate_config(&self) -> ValidationResult {
        match self.status {
            AiConfigStatus::Disabled => ValidationResult::Skipped("AI is disabled".to_string()),
            AiConfigStatus::MissingKey => {
                ValidationResult::Invalid("No API key configured".to_string())
            }
            AiConfigStatus::NotImplemented => ValidationResult::Valid(format!(
                "API key present ({}) - provider not yet implemented",
                self.key_source.as_str()
            )),
            AiConfigStatus::Ready => ValidationResult::Valid(format!(
                "API key present ({})",
                self.key_source.as_str()
            )),
        }
    }
}

// ============================================================================
// Diagnostics (for CLI doctor and debugging)
// ============================================================================

/// Diagnostic information about AI configuration
#[derive(Debug)]
pub struct AiDiagnostics {
    pub provider: String,
    pub model: String,
    pub status: AiConfigStatus,
    pub key_present: bool,
    pub key_source: KeySource,
    pub endpoint: Option<String>,
}

impl AiDiagnostics {
    /// Create diagnostics from resolved config
    pub fn from_resolved(config: &ResolvedAiConfig) -> Self {
        Self {
            provider: config.provider.name().to_string(),
            model: config.model.clone(),
            status: config.status,
            key_present: config.api_key.is_some(),
            key_source: config.key_source,
            endpoint: if config.endpoint.is_empty() {
                None
            } else {
                Some(config.endpoint.clone())
            },
        }
    }

    /// Create diagnostics from current settings
    pub fn from_settings(settings: &crate::settings::AiSettings) -> Self {
        let config = ResolvedAiConfig::from_settings(settings);
        Self::from_resolved(&config)
    }
}

impl std::fmt::Display for AiDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AI Configuration")?;
        writeln!(f, "──────────────────────────────")?;
        writeln!(f, "Provider:    {}", self.provider)?;
        writeln!(f, "Status:      {}", self.status.as_str())?;
        writeln!(f, "Model:       {}", self.model)?;
        writeln!(
            f,
            "Key present: {}",
            if self.key_present { "yes" } else { "no" }
        )?;
        writeln!(f, "Key source:  {}", self.key_source.as_str())?;
        if let Some(endpoint) = &self.endpoint {
            writeln!(f, "Endpoint:    {}", endpoint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AiProvider, AiSettings};

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("gemini"), "MATRIXLAB_GEMINI_KEY");
        assert_eq!(env_var_name("openai"), "MATRIXLAB_OPENAI_KEY");
        assert_eq!(env_var_name("Gemini"), "MATRIXLAB_GEMINI_KEY");
    }

    #[test]
    fn test_key_lookup_from_env() {
        // Set a test env var
        env::set_var("MATRIXLAB_TESTPROVIDER_KEY", "test-key-123");

        let lookup = get_api_key("testprovider");
        assert_eq!(lookup.source, KeySource::Environment);
        assert_eq!(lookup.key, Some("test-key-123".to_string()));

        // Clean up
        env::remove_var("MATRIXLAB_TESTPROVIDER_KEY");
    }

    #[test]
    fn test_key_lookup_missing() {
        let lookup = get_api_key("nonexistent_provider_xyz");
        assert_eq!(lookup.source, KeySource::None);
        assert!(lookup.key.is_none());
    }

    #[test]
    fn test_resolved_disabled() {
        let config = ResolvedAiConfig::from_settings(&AiSettings::default());
        assert_eq!(config.status, AiConfigStatus::Disabled);
        assert!(config.api_key.is_none());
        assert!(!config.status.is_configured());
        assert!(!config.validate_config().is_valid());
    }

    #[test]
    fn test_resolved_missing_key() {
        env::remove_var("MATRIXLAB_ANTHROPIC_KEY");
        let mut settings = AiSettings::default();
        settings.provider = AiProvider::Anthropic;
        let config = ResolvedAiConfig::from_settings(&settings);
        assert_eq!(config.status, AiConfigStatus::MissingKey);
        assert!(config
            .blocking_reason
            .as_deref()
            .unwrap()
            .contains("MATRIXLAB_ANTHROPIC_KEY"));
    }

    #[test]
    fn test_resolved_ready_and_not_implemented() {
        env::set_var("MATRIXLAB_GEMINI_KEY", "k1");
        let mut settings = AiSettings::default();
        settings.provider = AiProvider::Gemini;
        let config = ResolvedAiConfig::from_settings(&settings);
        assert_eq!(config.status, AiConfigStatus::Ready);
        assert_eq!(config.model, "gemini-3-pro-preview");
        assert_eq!(
            config.endpoint,
            "https://generativelanguage.googleapis.com"
        );
        env::remove_var("MATRIXLAB_GEMINI_KEY");

        env::set_var("MATRIXLAB_OPENAI_KEY", "k2");
        settings.provider = AiProvider::OpenAI;
        let config = ResolvedAiConfig::from_settings(&settings);
        assert_eq!(config.status, AiConfigStatus::NotImplemented);
        assert!(config.status.is_configured());
        assert!(!config.status.is_ready());
        env::remove_var("MATRIXLAB_OPENAI_KEY");
    }
}
