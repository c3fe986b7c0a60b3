//! Token color themes
//!
//! Provides YAML-based theming for pill tokens with compile-time embedded themes
//! and user-defined themes from the config directory.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/pill/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::Deserialize;

use crate::pill::Token;

// Embed theme YAML files at compile time
pub const DEFAULT_YAML: &str = include_str!("../themes/default.yaml");
pub const OUTLINE_YAML: &str = include_str!("../themes/outline.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default", "outline")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default",
        yaml: DEFAULT_YAML,
    },
    BuiltinTheme {
        id: "outline",
        yaml: OUTLINE_YAML,
    },
];

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<TokenTheme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    TokenTheme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<TokenTheme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    TokenTheme::from_builtin(id)
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBB", or "#RRGGBBAA" when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub token: TokenThemeData,
}

/// Token colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenThemeData {
    pub text: String,
    pub background: String,
    pub highlight: String,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub border_width: Option<f32>,
}

/// Colors applied to every token created under a theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenColors {
    pub text: Color,
    pub background: Color,
    pub highlight: Color,
    /// No border is drawn when `None`
    pub border: Option<Color>,
    pub border_width: f32,
}

impl Default for TokenColors {
    fn default() -> Self {
        Self {
            text: Color::rgb(0xFF, 0xFF, 0xFF),
            background: Color::rgb(0xBB, 0xBB, 0xBB),
            highlight: Color::rgb(0x15, 0x7E, 0xFB),
            border: None,
            border_width: 1.0,
        }
    }
}

impl TokenColors {
    /// Overwrite the display colors of `token` with these colors
    pub fn apply_to(&self, token: &mut Token) {
        token.text_color = self.text;
        token.background_color = self.background;
        token.highlight_color = self.highlight;
        token.border_color = self.border;
        token.border_width = self.border_width;
    }
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTheme {
    pub name: String,
    pub colors: TokenColors,
}

impl TokenTheme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        TokenTheme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let defaults = TokenColors::default();
        let token = data.token;

        Ok(TokenTheme {
            name: data.name,
            colors: TokenColors {
                text: Color::from_hex(&token.text)?,
                background: Color::from_hex(&token.background)?,
                highlight: Color::from_hex(&token.highlight)?,
                border: token
                    .border
                    .as_ref()
                    .map(|s| Color::from_hex(s))
                    .transpose()?,
                border_width: token.border_width.unwrap_or(defaults.border_width),
            },
        })
    }

    /// Default theme (YAML-backed with Rust fallback)
    pub fn default_theme() -> Self {
        match TokenTheme::from_yaml(DEFAULT_YAML) {
            Ok(theme) => theme,
            Err(_) => TokenTheme {
                name: "Default".to_string(),
                colors: TokenColors::default(),
            },
        }
    }
}

impl Default for TokenTheme {
    fn default() -> Self {
        Self::default_theme()
    }
}
