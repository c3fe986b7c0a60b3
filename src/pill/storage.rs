//! StyledBuffer - the text storage that embeds tokens as single characters.
//!
//! Characters live in a `ropey::Rope`; attributes live in a run list that
//! always covers the rope exactly. A token occupies a run of length one whose
//! character is [`TOKEN_PLACEHOLDER`]. The token → offset index is derived
//! state, cached until the next edit that changes length or token slots.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::ops::Range;

use ropey::Rope;

use super::attributes::{Attribute, AttributeKey, TextAttributes};
use super::messages::EditNotification;
use super::token::{Token, TokenId};

/// The character stored in a token's slot (OBJECT REPLACEMENT CHARACTER).
pub const TOKEN_PLACEHOLDER: char = '\u{FFFC}';

/// Default look-back distance for [`StyledBuffer::closest_token_following_or_at`].
pub const DEFAULT_LOOK_BACK: usize = 3;

/// Replacement content for [`StyledBuffer::replace_characters`].
#[derive(Debug)]
pub enum Replacement<'a> {
    /// Literal text, inserted as-is
    Text(&'a str),
    /// A token, inserted as one placeholder character
    Token(Token),
}

impl<'a> From<&'a str> for Replacement<'a> {
    fn from(text: &'a str) -> Self {
        Replacement::Text(text)
    }
}

impl<'a> From<&'a String> for Replacement<'a> {
    fn from(text: &'a String) -> Self {
        Replacement::Text(text.as_str())
    }
}

impl From<Token> for Replacement<'_> {
    fn from(token: Token) -> Self {
        Replacement::Token(token)
    }
}

#[derive(Debug)]
struct Run {
    len: usize,
    attributes: TextAttributes,
    token: Option<Token>,
}

impl Run {
    fn text(len: usize, attributes: TextAttributes) -> Self {
        Self {
            len,
            attributes,
            token: None,
        }
    }

    fn token(token: Token, attributes: TextAttributes) -> Self {
        Self {
            len: 1,
            attributes,
            token: Some(token),
        }
    }

    fn can_merge(&self, next: &Run) -> bool {
        self.token.is_none() && next.token.is_none() && self.attributes == next.attributes
    }
}

/// Mutable styled text with embedded tokens.
#[derive(Debug, Default)]
pub struct StyledBuffer {
    rope: Rope,
    /// Attribute runs, in order, covering every character exactly once
    runs: Vec<Run>,
    /// Token → offset cache; empty cell means dirty
    index: OnceCell<HashMap<TokenId, usize>>,
    edits: Vec<EditNotification>,
}

impl StyledBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` literally (no tokenization).
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.replace_characters(0..0, text);
        buffer.edits.clear();
        buffer
    }

    /// Length in characters; every token counts as one.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw character content, with tokens as [`TOKEN_PLACEHOLDER`].
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The content of `range` as plain text, tokens rendered as their content text.
    pub fn plain_text(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        let mut out = String::new();
        let mut pos = 0;
        for run in &self.runs {
            let run_range = pos..pos + run.len;
            pos += run.len;
            let start = run_range.start.max(range.start);
            let end = run_range.end.min(range.end);
            if start >= end {
                if run_range.start >= range.end {
                    break;
                }
                continue;
            }
            match &run.token {
                Some(token) => out.push_str(token.content_text()),
                None => out.extend(self.rope.slice(start..end).chars()),
            }
        }
        out
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        start..end
    }

    // =========================================================================
    // Run bookkeeping
    // =========================================================================

    /// Ensure a run boundary at `offset`, returning the index of the run that
    /// starts there (or `runs.len()` at the end of the buffer).
    fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.runs.len() {
            if pos == offset {
                return i;
            }
            let len = self.runs[i].len;
            if offset < pos + len {
                // Token runs have length 1, so only text runs are ever split
                debug_assert!(self.runs[i].token.is_none());
                let tail = Run::text(pos + len - offset, self.runs[i].attributes.clone());
                self.runs[i].len = offset - pos;
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            pos += len;
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            if let Some(last) = merged.last_mut() {
                if last.can_merge(&run) {
                    last.len += run.len;
                    continue;
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }

    fn run_at(&self, offset: usize) -> Option<(Range<usize>, &Run)> {
        let mut pos = 0;
        for run in &self.runs {
            if offset < pos + run.len {
                return Some((pos..pos + run.len, run));
            }
            pos += run.len;
        }
        None
    }

    fn token_run_mut(&mut self, offset: usize) -> Option<&mut Token> {
        let mut pos = 0;
        for run in &mut self.runs {
            if offset < pos + run.len {
                return run.token.as_mut();
            }
            pos += run.len;
        }
        None
    }

    /// Attributes new text picks up: the first replaced character, or the
    /// character before a pure insertion. Never the token itself.
    fn inherited_attributes(&self, range: &Range<usize>) -> TextAttributes {
        let source = if !range.is_empty() {
            Some(range.start)
        } else if range.start > 0 {
            Some(range.start - 1)
        } else {
            None
        };
        source
            .or(if self.is_empty() { None } else { Some(0) })
            .and_then(|offset| self.run_at(offset))
            .map(|(_, run)| run.attributes.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Character mutation
    // =========================================================================

    /// Replace `range` with literal text or with a single token slot.
    ///
    /// Plain text is never tokenized here. The token index is invalidated when
    /// the length changes or a token slot is removed or inserted.
    pub fn replace_characters<'a>(&mut self, range: Range<usize>, with: impl Into<Replacement<'a>>) {
        let range = self.clamp(range);
        let attributes = self.inherited_attributes(&range);
        let start_idx = self.split_at(range.start);
        let end_idx = self.split_at(range.end);
        let removed_tokens: Vec<TokenId> = self
            .runs
            .drain(start_idx..end_idx)
            .filter_map(|run| run.token.map(|token| token.id()))
            .collect();
        self.rope.remove(range.clone());

        let (inserted_len, inserted_token) = match with.into() {
            Replacement::Text(text) => {
                let len = text.chars().count();
                if len > 0 {
                    self.rope.insert(range.start, text);
                    self.runs.insert(start_idx, Run::text(len, attributes));
                }
                (len, false)
            }
            Replacement::Token(token) => {
                self.rope.insert_char(range.start, TOKEN_PLACEHOLDER);
                self.runs.insert(start_idx, Run::token(token, attributes));
                (1, true)
            }
        };
        self.coalesce();

        let delta = inserted_len as isize - range.len() as isize;
        if delta != 0 || inserted_token || !removed_tokens.is_empty() {
            self.index.take();
        }
        if !removed_tokens.is_empty() {
            tracing::trace!(?removed_tokens, "tokens removed from buffer");
        }
        self.edits.push(EditNotification::characters(
            range.start..range.start + inserted_len,
            delta,
        ));
    }

    /// Replace the entire contents with literal text.
    pub fn set_text(&mut self, text: &str) {
        self.replace_characters(0..self.len(), text);
    }

    pub fn insert_text(&mut self, offset: usize, text: &str) {
        self.replace_characters(offset..offset, text);
    }

    pub fn delete_characters(&mut self, range: Range<usize>) {
        self.replace_characters(range, "");
    }

    /// Insert a token at the given character offset.
    pub fn insert_token(&mut self, token: Token, offset: usize) {
        self.replace_characters(offset..offset, token);
    }

    /// Add a token to the end of the buffer.
    pub fn append_token(&mut self, token: Token) {
        let end = self.len();
        self.replace_characters(end..end, token);
    }

    /// Delete the token at `offset`. Returns false when no token is there.
    pub fn delete_token_at(&mut self, offset: usize) -> bool {
        if self.token_at(offset).is_none() {
            return false;
        }
        self.replace_characters(offset..offset + 1, "");
        true
    }

    /// Replace the entire contents with another buffer's characters, attributes
    /// and tokens.
    pub fn replace_contents(&mut self, other: StyledBuffer) {
        let old_len = self.len();
        self.rope = other.rope;
        self.runs = other.runs;
        self.index.take();
        let new_len = self.len();
        self.edits.push(EditNotification::characters(
            0..new_len,
            new_len as isize - old_len as isize,
        ));
    }

    // =========================================================================
    // Attribute mutation
    // =========================================================================

    /// Add an attribute to `range` and to every token embedded in it.
    ///
    /// Never changes length, so the token index stays valid.
    pub fn add_attribute(&mut self, attribute: Attribute, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start_idx = self.split_at(range.start);
        let end_idx = self.split_at(range.end);
        for run in &mut self.runs[start_idx..end_idx] {
            run.attributes.set(attribute.clone());
            if let Some(token) = run.token.as_mut() {
                token.add_attribute(attribute.clone());
            }
        }
        self.coalesce();
        self.edits.push(EditNotification::attributes(range));
    }

    /// Remove an attribute from `range` and from every token embedded in it.
    pub fn remove_attribute(&mut self, key: AttributeKey, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start_idx = self.split_at(range.start);
        let end_idx = self.split_at(range.end);
        for run in &mut self.runs[start_idx..end_idx] {
            run.attributes.clear(key);
            if let Some(token) = run.token.as_mut() {
                token.remove_attribute(key);
            }
        }
        self.coalesce();
        self.edits.push(EditNotification::attributes(range));
    }

    /// Replace the attributes of `range`. Embedded tokens keep their slots.
    pub fn set_attributes(&mut self, attributes: TextAttributes, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start_idx = self.split_at(range.start);
        let end_idx = self.split_at(range.end);
        for run in &mut self.runs[start_idx..end_idx] {
            run.attributes = attributes.clone();
        }
        self.coalesce();
        self.edits.push(EditNotification::attributes(range));
    }

    /// Add an attribute to the whole buffer, tokens included.
    pub fn add_attribute_to_all(&mut self, attribute: Attribute) {
        self.add_attribute(attribute, 0..self.len());
    }

    /// Remove an attribute from the whole buffer, tokens included.
    pub fn remove_attribute_from_all(&mut self, key: AttributeKey) {
        self.remove_attribute(key, 0..self.len());
    }

    /// Add an attribute to the token labels only.
    pub fn add_attribute_to_all_tokens(&mut self, attribute: Attribute) {
        let mut touched = Vec::new();
        let mut pos = 0;
        for run in &mut self.runs {
            if let Some(token) = run.token.as_mut() {
                token.add_attribute(attribute.clone());
                touched.push(pos);
            }
            pos += run.len;
        }
        for offset in touched {
            self.invalidate_display(offset..offset + 1);
        }
    }

    /// Remove an attribute from the token labels only.
    pub fn remove_attribute_from_all_tokens(&mut self, key: AttributeKey) {
        let mut touched = Vec::new();
        let mut pos = 0;
        for run in &mut self.runs {
            if let Some(token) = run.token.as_mut() {
                token.remove_attribute(key);
                touched.push(pos);
            }
            pos += run.len;
        }
        for offset in touched {
            self.invalidate_display(offset..offset + 1);
        }
    }

    /// Attributes at `offset` together with the range of the run holding them.
    pub fn attributes_at(&self, offset: usize) -> Option<(&TextAttributes, Range<usize>)> {
        self.run_at(offset)
            .map(|(range, run)| (&run.attributes, range))
    }

    // =========================================================================
    // Token index
    // =========================================================================

    /// Token → offset for every embedded token.
    ///
    /// Iteration order is unspecified; sort by offset where order matters.
    pub fn tokens(&self) -> &HashMap<TokenId, usize> {
        self.index.get_or_init(|| self.scan_tokens())
    }

    /// Full rescan of the runs for embedded tokens, bypassing the cache.
    pub fn scan_tokens(&self) -> HashMap<TokenId, usize> {
        let mut index = HashMap::new();
        let mut offset = 0;
        for run in &self.runs {
            if let Some(token) = &run.token {
                assert_eq!(run.len, 1, "token {} must occupy exactly one slot", token.id());
                index.insert(token.id(), offset);
            }
            offset += run.len;
        }
        tracing::trace!(count = index.len(), "scanned token index");
        index
    }

    /// Whether the cached index is current (false means the next read rescans).
    pub fn is_index_valid(&self) -> bool {
        self.index.get().is_some()
    }

    pub fn has_tokens(&self) -> bool {
        !self.tokens().is_empty()
    }

    /// Tokens with their offsets, in ascending offset order.
    pub fn iter_tokens(&self) -> impl Iterator<Item = (usize, &Token)> {
        let mut pos = 0;
        self.runs.iter().filter_map(move |run| {
            let offset = pos;
            pos += run.len;
            run.token.as_ref().map(|token| (offset, token))
        })
    }

    // =========================================================================
    // Token queries
    // =========================================================================

    pub fn token_index_of(&self, id: TokenId) -> Option<usize> {
        self.tokens().get(&id).copied()
    }

    pub fn token_range_of(&self, id: TokenId) -> Option<Range<usize>> {
        self.token_index_of(id).map(|offset| offset..offset + 1)
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.token_index_of(id)
            .and_then(|offset| self.token_at(offset))
    }

    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        let offset = self.token_index_of(id)?;
        self.token_run_mut(offset)
    }

    /// The token occupying `offset`, if any.
    pub fn token_at(&self, offset: usize) -> Option<&Token> {
        if offset >= self.len() {
            return None;
        }
        self.run_at(offset).and_then(|(_, run)| run.token.as_ref())
    }

    /// The token whose slot is exactly `range`; a range merely containing a
    /// token does not count.
    pub fn token_exactly_at(&self, range: Range<usize>) -> Option<&Token> {
        if range.len() != 1 || range.end > self.len() {
            return None;
        }
        self.token_at(range.start)
    }

    /// The first token, by offset, inside `range`.
    pub fn first_token_in(&self, range: Range<usize>) -> Option<&Token> {
        if !self.has_tokens() {
            return None;
        }
        let range = self.clamp(range);
        self.iter_tokens()
            .take_while(|(offset, _)| *offset < range.end)
            .find(|(offset, _)| *offset >= range.start)
            .map(|(_, token)| token)
    }

    /// All tokens inside `range`, in offset order. An empty range yields the
    /// token at its location, if any.
    pub fn all_tokens_in(&self, range: Range<usize>) -> Vec<&Token> {
        if range.is_empty() {
            return self.token_at(range.start).into_iter().collect();
        }
        self.iter_tokens()
            .take_while(|(offset, _)| *offset < range.end)
            .filter(|(offset, _)| *offset >= range.start)
            .map(|(_, token)| token)
            .collect()
    }

    /// The first token at or after `offset - look_back`, wrapping to the start
    /// of the buffer when `wrap` is set and nothing follows.
    pub fn closest_token_following_or_at(
        &self,
        offset: usize,
        look_back: usize,
        wrap: bool,
    ) -> Option<&Token> {
        let len = self.len();
        let start = offset.saturating_sub(look_back).min(len);
        let found = self.first_token_in(start..len);
        if found.is_some() || !wrap {
            return found;
        }
        // The tail start..len is already searched
        self.first_token_in(0..start)
    }

    /// The token with the next-higher offset, wrapping to the lowest offset
    /// when `wrap` is set. None with fewer than two tokens.
    pub fn token_following(&self, id: TokenId, wrap: bool) -> Option<&Token> {
        let index = self.tokens();
        if index.len() < 2 {
            return None;
        }
        let current = *index.get(&id)?;
        let mut offsets: Vec<usize> = index.values().copied().collect();
        offsets.sort_unstable();
        let next = offsets
            .iter()
            .copied()
            .find(|offset| *offset > current)
            .or_else(|| if wrap { offsets.first().copied() } else { None })?;
        self.token_at(next)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Record that `range` needs redrawing without any content change.
    pub fn invalidate_display(&mut self, range: Range<usize>) {
        self.edits.push(EditNotification::display(range));
    }

    /// Drain pending edit notifications.
    pub fn take_edits(&mut self) -> Vec<EditNotification> {
        std::mem::take(&mut self.edits)
    }

    pub fn pending_edits(&self) -> &[EditNotification] {
        &self.edits
    }
}
