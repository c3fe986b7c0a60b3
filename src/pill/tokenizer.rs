//! Tokenizer - turns delimited substrings into tokens.
//!
//! A match of the delimiter pattern becomes one token whose content is the
//! first capture group. Matches are collected left to right and applied to the
//! buffer right to left, so earlier offsets stay valid while later matches are
//! replaced.

use std::ops::Range;

use regex::Regex;
use thiserror::Error;

use crate::theme::TokenColors;

use super::storage::StyledBuffer;
use super::token::Token;

/// Opening angle bracket, non-greedy content, closing angle bracket.
pub const DEFAULT_PATTERN: &str = "<(.*?)>";

/// A delimiter pattern rejected at setup time.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid delimiter pattern `{pattern}`: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("delimiter pattern `{pattern}` has no capture group for the token content")]
    MissingCaptureGroup { pattern: String },
}

/// Parses delimited substrings out of plain text.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    regex: Regex,
    colors: TokenColors,
}

impl Tokenizer {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        })?;
        // Group 0 is the whole match
        if regex.captures_len() < 2 {
            return Err(PatternError::MissingCaptureGroup {
                pattern: pattern.to_string(),
            });
        }
        Ok(Self {
            regex,
            colors: TokenColors::default(),
        })
    }

    /// Colors given to every token this tokenizer creates.
    pub fn with_colors(mut self, colors: TokenColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Scan `text` for matches, left to right.
    ///
    /// Ranges are character offsets into `text` covering the whole match
    /// (delimiters included).
    pub fn parse(&self, text: &str) -> Vec<(Range<usize>, Token)> {
        let mut matches = Vec::new();
        // Running byte → char conversion; matches arrive in ascending order
        let mut byte_pos = 0;
        let mut char_pos = 0;
        let mut to_chars = |byte: usize| {
            char_pos += text[byte_pos..byte].chars().count();
            byte_pos = byte;
            char_pos
        };

        for captures in self.regex.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let content = captures.get(1).map_or("", |m| m.as_str());
            let start = to_chars(whole.start());
            let end = to_chars(whole.end());
            matches.push((start..end, Token::with_colors(content, &self.colors)));
        }

        tracing::debug!(count = matches.len(), "parsed tokens");
        matches
    }

    /// Replace the contents of `buffer` with `text`, then swap every match for
    /// its token.
    pub fn tokenize_into(&self, buffer: &mut StyledBuffer, text: &str) {
        let matches = self.parse(text);
        buffer.set_text(text);
        // Highest offset first so pending ranges are unaffected
        for (range, token) in matches.into_iter().rev() {
            buffer.replace_characters(range, token);
        }
    }

    /// Build a new buffer from `text`.
    pub fn tokenize(&self, text: &str) -> StyledBuffer {
        let mut buffer = StyledBuffer::new();
        self.tokenize_into(&mut buffer, text);
        buffer.take_edits();
        buffer
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN).expect("default delimiter pattern must compile")
    }
}

impl StyledBuffer {
    /// Replace the entire contents with `text`, parsed for tokens.
    pub fn set_tokenized(&mut self, text: &str, tokenizer: &Tokenizer) {
        tokenizer.tokenize_into(self, text);
    }

    /// Replace the entire contents with a previously tokenized string.
    pub fn set_tokenized_string(&mut self, tokenized: TokenizedString) {
        self.replace_contents(tokenized.buffer);
    }
}

/// A string together with its tokenized buffer.
#[derive(Debug)]
pub struct TokenizedString {
    original: String,
    buffer: StyledBuffer,
}

impl TokenizedString {
    pub fn new(text: &str, tokenizer: &Tokenizer) -> Self {
        Self {
            original: text.to_string(),
            buffer: tokenizer.tokenize(text),
        }
    }

    /// The string as given, before tokenization.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn buffer(&self) -> &StyledBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> StyledBuffer {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(buffer: &StyledBuffer) -> Vec<(usize, String)> {
        buffer
            .iter_tokens()
            .map(|(offset, token)| (offset, token.content_text().to_string()))
            .collect()
    }

    #[test]
    fn test_parse_collects_left_to_right() {
        let tokenizer = Tokenizer::default();
        let matches = tokenizer.parse("Hey <Xcode>, check out my <pills>!");
        let summary: Vec<(Range<usize>, &str)> = matches
            .iter()
            .map(|(range, token)| (range.clone(), token.content_text()))
            .collect();
        assert_eq!(summary, vec![(4..11, "Xcode"), (26..33, "pills")]);
    }

    #[test]
    fn test_tokenize_scenario() {
        let buffer = Tokenizer::default().tokenize("Hey <Xcode>, check out my <pills>!");
        // Second token shifts left by the 6 characters the first one saved
        assert_eq!(
            contents(&buffer),
            vec![(4, "Xcode".to_string()), (20, "pills".to_string())]
        );
        assert_eq!(buffer.plain_text(0..buffer.len()), "Hey Xcode, check out my pills!");
    }

    #[test]
    fn test_adjacent_tokens() {
        let buffer = Tokenizer::default().tokenize("<a><b>");
        assert_eq!(buffer.len(), 2);
        assert_eq!(
            contents(&buffer),
            vec![(0, "a".to_string()), (1, "b".to_string())]
        );
    }

    #[test]
    fn test_empty_content_token() {
        let buffer = Tokenizer::default().tokenize("x<>y");
        assert_eq!(buffer.len(), 3);
        assert_eq!(contents(&buffer), vec![(1, String::new())]);
    }

    #[test]
    fn test_unclosed_marker_is_literal() {
        let buffer = Tokenizer::default().tokenize("a <b and more");
        assert!(!buffer.has_tokens());
        assert_eq!(buffer.text(), "a <b and more");
    }

    #[test]
    fn test_non_greedy_match() {
        let buffer = Tokenizer::default().tokenize("<a> and <b>");
        assert_eq!(
            contents(&buffer),
            vec![(0, "a".to_string()), (6, "b".to_string())]
        );
    }

    #[test]
    fn test_multibyte_offsets() {
        let buffer = Tokenizer::default().tokenize("é <pills💊> ü <x>");
        assert_eq!(
            contents(&buffer),
            vec![(2, "pills💊".to_string()), (6, "x".to_string())]
        );
    }

    #[test]
    fn test_custom_pattern() {
        let tokenizer = Tokenizer::new(r"\{\{(.*?)\}\}").unwrap();
        let buffer = tokenizer.tokenize("Hi {{name}}, <not this>");
        assert_eq!(contents(&buffer), vec![(3, "name".to_string())]);
        assert_eq!(tokenizer.pattern(), r"\{\{(.*?)\}\}");
    }

    #[test]
    fn test_invalid_pattern_is_setup_error() {
        assert!(matches!(
            Tokenizer::new("<(.*?"),
            Err(PatternError::Invalid { .. })
        ));
        assert!(matches!(
            Tokenizer::new("<.*?>"),
            Err(PatternError::MissingCaptureGroup { .. })
        ));
    }

    #[test]
    fn test_tokenize_into_replaces_contents() {
        let mut buffer = StyledBuffer::from_text("previous");
        Tokenizer::default().tokenize_into(&mut buffer, "<one>");
        assert_eq!(buffer.len(), 1);
        assert!(buffer.token_at(0).is_some());
    }

    #[test]
    fn test_tokens_get_configured_colors() {
        let colors = TokenColors {
            border: Some(crate::theme::Color::rgb(1, 2, 3)),
            ..TokenColors::default()
        };
        let buffer = Tokenizer::default().with_colors(colors).tokenize("<x>");
        assert_eq!(buffer.token_at(0).unwrap().border_color, colors.border);
    }

    #[test]
    fn test_tokenized_string_keeps_original() {
        let tokenized = TokenizedString::new("a <b>", &Tokenizer::default());
        assert_eq!(tokenized.original(), "a <b>");
        assert_eq!(tokenized.buffer().len(), 3);

        let mut buffer = StyledBuffer::new();
        buffer.set_tokenized_string(tokenized);
        assert_eq!(contents(&buffer), vec![(2, "b".to_string())]);
    }
}
