//! Pill configuration persistence
//!
//! Stores user preferences in `~/.config/pill/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pill::{Font, PatternError, PillController, PillStyle, Tokenizer, DEFAULT_LOOK_BACK};
use crate::theme::TokenTheme;

/// Token font as stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default = "default_font_family")]
    pub family: String,
    #[serde(default = "default_font_size")]
    pub size: f32,
}

fn default_font_family() -> String {
    "system".to_string()
}

fn default_font_size() -> f32 {
    13.0
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: default_font_family(),
            size: default_font_size(),
        }
    }
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillConfig {
    /// Delimiter pattern; capture group 1 is the token content
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Token theme id (e.g., "default", "outline")
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub font: FontConfig,
    /// Horizontal padding on each side of a token label
    #[serde(default = "default_text_width_padding")]
    pub text_width_padding: f32,
    /// Pill corner radius; unset means a fifth of the pill height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    /// How far behind the caret tab navigation looks for a token
    #[serde(default = "default_look_back")]
    pub look_back: usize,
}

fn default_pattern() -> String {
    crate::pill::DEFAULT_PATTERN.to_string()
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_text_width_padding() -> f32 {
    7.0
}

fn default_look_back() -> usize {
    DEFAULT_LOOK_BACK
}

impl Default for PillConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            theme: default_theme(),
            font: FontConfig::default(),
            text_width_padding: default_text_width_padding(),
            corner_radius: None,
            look_back: default_look_back(),
        }
    }
}

impl PillConfig {
    /// Load config from the config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The configured theme, or the default theme if it cannot be loaded
    pub fn theme(&self) -> TokenTheme {
        match crate::theme::load_theme(&self.theme) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Failed to load theme '{}': {}, using default", self.theme, e);
                TokenTheme::default_theme()
            }
        }
    }

    /// Tokenizer for the configured pattern, coloring tokens with the theme
    pub fn tokenizer(&self) -> Result<Tokenizer, PatternError> {
        Ok(Tokenizer::new(&self.pattern)?.with_colors(self.theme().colors))
    }

    pub fn style(&self) -> PillStyle {
        PillStyle {
            font: Font::new(self.font.family.clone(), self.font.size),
            corner_radius: self.corner_radius,
            text_width_padding: self.text_width_padding,
        }
    }

    /// An empty controller set up from this config
    pub fn controller(&self) -> Result<PillController, PatternError> {
        Ok(PillController::default()
            .with_tokenizer(self.tokenizer()?)
            .with_style(self.style())
            .with_look_back(self.look_back))
    }
}
