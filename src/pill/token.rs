//! The pill token: one atomic inline badge occupying one character slot.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::theme::{Color, TokenColors};

use super::attributes::{Attribute, AttributeKey, Font, TextAttributes};

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a token. Two tokens with identical text have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u64);

impl TokenId {
    fn next() -> Self {
        Self(NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type of interaction the user performed on a selected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserInteraction {
    /// Delete key while a token is selected
    Delete,
    /// Enter key while a token is selected
    Enter,
    /// Double click on the selected token
    DoubleClick,
}

/// What to do with a selected token after a user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementAction {
    /// Replace the token with an empty string
    Delete,
    /// Replace the token with its content text
    Insert,
    /// Do nothing
    Ignore,
}

/// A pill token.
///
/// Tokens are not `Clone`: a token is owned by exactly one buffer slot, and
/// equality is identity (`TokenId`), never content.
#[derive(Debug)]
pub struct Token {
    id: TokenId,
    source_text: String,
    /// Color of the label text
    pub text_color: Color,
    /// Fill color when not selected
    pub background_color: Color,
    /// Fill color when selected
    pub highlight_color: Color,
    /// No border is drawn when `None`
    pub border_color: Option<Color>,
    pub border_width: f32,
    selected: bool,
    label_attributes: TextAttributes,
}

impl Token {
    /// Create a token with the default colors.
    pub fn new(source_text: impl Into<String>) -> Self {
        Self::with_colors(source_text, &TokenColors::default())
    }

    pub fn with_colors(source_text: impl Into<String>, colors: &TokenColors) -> Self {
        Self {
            id: TokenId::next(),
            source_text: source_text.into(),
            text_color: colors.text,
            background_color: colors.background,
            highlight_color: colors.highlight,
            border_color: colors.border,
            border_width: colors.border_width,
            selected: false,
            label_attributes: TextAttributes::default(),
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    /// The text originally captured between the delimiters.
    pub fn content_text(&self) -> &str {
        &self.source_text
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// The fill color for the current highlight state.
    pub fn fill_color(&self) -> Color {
        if self.selected {
            self.highlight_color
        } else {
            self.background_color
        }
    }

    /// Attributes forwarded from the surrounding text.
    pub fn label_attributes(&self) -> &TextAttributes {
        &self.label_attributes
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.label_attributes.set(attribute);
    }

    pub fn remove_attribute(&mut self, key: AttributeKey) {
        self.label_attributes.clear(key);
    }

    /// The label as it is drawn: forwarded attributes, then the token font
    /// and text color layered on top.
    pub fn display_label(&self, font: &Font) -> TokenLabel {
        let attributes = self
            .label_attributes
            .clone()
            .with(Attribute::Font(font.clone()))
            .with(Attribute::ForegroundColor(self.text_color));
        TokenLabel {
            text: self.source_text.clone(),
            attributes,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

/// A formatted token label ready for measuring and drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLabel {
    pub text: String,
    pub attributes: TextAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_with_same_text_are_distinct() {
        let a = Token::new("Xcode");
        let b = Token::new("Xcode");
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a.content_text(), b.content_text());
    }

    #[test]
    fn test_default_colors() {
        let token = Token::new("x");
        assert_eq!(token.text_color, Color::rgb(0xFF, 0xFF, 0xFF));
        assert_eq!(token.background_color, Color::rgb(0xBB, 0xBB, 0xBB));
        assert_eq!(token.highlight_color, Color::rgb(0x15, 0x7E, 0xFB));
        assert_eq!(token.border_color, None);
        assert_eq!(token.border_width, 1.0);
        assert!(!token.is_selected());
    }

    #[test]
    fn test_fill_color_tracks_selection() {
        let mut token = Token::new("x");
        assert_eq!(token.fill_color(), token.background_color);
        token.set_selected(true);
        assert_eq!(token.fill_color(), token.highlight_color);
    }

    #[test]
    fn test_empty_content() {
        let token = Token::new("");
        assert_eq!(token.content_text(), "");
    }

    #[test]
    fn test_display_label_layers_font_and_color() {
        let mut token = Token::new("pills");
        token.add_attribute(Attribute::BaselineOffset(2.0));
        token.add_attribute(Attribute::ForegroundColor(Color::rgb(1, 1, 1)));

        let label = token.display_label(&Font::new("mono", 11.0));
        assert_eq!(label.text, "pills");
        assert_eq!(label.attributes.baseline_offset, Some(2.0));
        assert_eq!(label.attributes.font, Some(Font::new("mono", 11.0)));
        // The token's own text color wins over forwarded colors
        assert_eq!(label.attributes.foreground, Some(token.text_color));
    }

    #[test]
    fn test_remove_attribute() {
        let mut token = Token::new("x");
        token.add_attribute(Attribute::BaselineOffset(2.0));
        token.remove_attribute(AttributeKey::BaselineOffset);
        assert!(token.label_attributes().is_empty());
    }
}
