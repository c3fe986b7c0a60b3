//! Character attributes for the styled buffer.
//!
//! Attributes are typed rather than keyed by string. The embedded-token
//! attribute is deliberately absent here: it lives on the buffer's runs so it
//! can only ever cover a single character slot.

use crate::theme::Color;

/// Font description used for surrounding text and token labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    /// Distance below the baseline (negative, in points)
    pub descender: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            descender: -(size * 0.25),
        }
    }

    /// Platform system font at the standard size
    pub fn system() -> Self {
        Self::new("system", 13.0)
    }

    pub fn with_descender(mut self, descender: f32) -> Self {
        self.descender = descender;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system()
    }
}

/// Paragraph layout settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParagraphStyle {
    pub minimum_line_height: Option<f32>,
    pub maximum_line_height: Option<f32>,
    pub line_spacing: f32,
}

/// Identifies one attribute slot, for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Font,
    ForegroundColor,
    BackgroundColor,
    ParagraphStyle,
    BaselineOffset,
}

/// A single attribute with its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Font(Font),
    ForegroundColor(Color),
    BackgroundColor(Color),
    ParagraphStyle(ParagraphStyle),
    /// Vertical baseline shift in points
    BaselineOffset(f32),
}

impl Attribute {
    pub fn key(&self) -> AttributeKey {
        match self {
            Attribute::Font(_) => AttributeKey::Font,
            Attribute::ForegroundColor(_) => AttributeKey::ForegroundColor,
            Attribute::BackgroundColor(_) => AttributeKey::BackgroundColor,
            Attribute::ParagraphStyle(_) => AttributeKey::ParagraphStyle,
            Attribute::BaselineOffset(_) => AttributeKey::BaselineOffset,
        }
    }
}

/// The attribute set of a run of characters. Unset slots are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAttributes {
    pub font: Option<Font>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub paragraph: Option<ParagraphStyle>,
    pub baseline_offset: Option<f32>,
}

impl TextAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: Attribute) -> Self {
        self.set(attribute);
        self
    }

    pub fn set(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Font(font) => self.font = Some(font),
            Attribute::ForegroundColor(color) => self.foreground = Some(color),
            Attribute::BackgroundColor(color) => self.background = Some(color),
            Attribute::ParagraphStyle(style) => self.paragraph = Some(style),
            Attribute::BaselineOffset(offset) => self.baseline_offset = Some(offset),
        }
    }

    pub fn clear(&mut self, key: AttributeKey) {
        match key {
            AttributeKey::Font => self.font = None,
            AttributeKey::ForegroundColor => self.foreground = None,
            AttributeKey::BackgroundColor => self.background = None,
            AttributeKey::ParagraphStyle => self.paragraph = None,
            AttributeKey::BaselineOffset => self.baseline_offset = None,
        }
    }

    pub fn get(&self, key: AttributeKey) -> Option<Attribute> {
        match key {
            AttributeKey::Font => self.font.clone().map(Attribute::Font),
            AttributeKey::ForegroundColor => self.foreground.map(Attribute::ForegroundColor),
            AttributeKey::BackgroundColor => self.background.map(Attribute::BackgroundColor),
            AttributeKey::ParagraphStyle => self.paragraph.map(Attribute::ParagraphStyle),
            AttributeKey::BaselineOffset => self.baseline_offset.map(Attribute::BaselineOffset),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
