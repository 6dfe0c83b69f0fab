// Application settings
// Loaded from ~/.config/matrixlab/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// AI features disabled (default)
    #[default]
    None,
    /// Google generative-language API
    Gemini,
    /// OpenAI API
    #[serde(rename = "openai")]
    OpenAI,
    /// Anthropic API
    Anthropic,
}

impl AiProvider {
    /// Returns true if AI features are enabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AiProvider::None)
    }

    /// Lowercase provider name for display and key lookup
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::None => "none",
            AiProvider::Gemini => "gemini",
            AiProvider::OpenAI => "openai",
            AiProvider::Anthropic => "anthropic",
        }
    }

    /// Returns the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::None => "",
            AiProvider::Gemini => "gemini-3-pro-preview",
            AiProvider::OpenAI => "gpt-4o",
            AiProvider::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    /// All current providers are hosted APIs needing a key
    pub fn needs_api_key(&self) -> bool {
        self.is_enabled()
    }

    /// Whether the insight call is wired up for this provider
    pub fn is_implemented(&self) -> bool {
        matches!(self, AiProvider::Gemini)
    }
}

/// AI-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Selected AI provider
    pub provider: AiProvider,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Custom API base URL (self-hosted gateways; tests)
    pub endpoint: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: AiProvider::None,
            model: String::new(), // Empty = use provider default
            endpoint: None,
        }
    }
}

impl AiSettings {
    /// Get the effective model (user-specified or provider default)
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    /// Get the effective API base URL
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Canvas
    #[serde(rename = "canvas.showGrid")]
    pub show_grid: bool,

    /// Half-width of the canvas viewport in scene units
    #[serde(rename = "canvas.extent")]
    pub canvas_extent: f64,

    // AI
    #[serde(rename = "ai", default)]
    pub ai: AiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Canvas
            show_grid: true,
            canvas_extent: 5.0,
            // AI
            ai: AiSettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("matrixlab");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file();
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error parsing settings.json: {}", e);
                        eprintln!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(&path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self) {
        let path = Self::config_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Canvas
    "canvas.showGrid": true,
    "canvas.extent": 5,

    // AI (disabled by default)
    // Provider options: "none", "gemini", "openai", "anthropic"
    // API keys come from MATRIXLAB_<PROVIDER>_KEY, never from this file
    "ai": {
        "provider": "none",
        "model": ""
    }
}
"#;

        if let Err(e) = fs::write(&path, default_config) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
