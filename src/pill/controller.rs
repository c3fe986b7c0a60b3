//! PillController - navigation and selection over a styled buffer.
//!
//! The controller owns the buffer, the caret/selection range and a non-owning
//! reference (a [`TokenId`]) to the selected token. Host events arrive as
//! [`PillAction`]s and pointer hits; the controller either handles them as
//! token interactions or applies the default single-character editing
//! behavior itself.

use std::fmt;
use std::ops::Range;

use super::attributes::{Attribute, Font, ParagraphStyle};
use super::messages::{EditNotification, EventResult, PillAction};
use super::policy::{DefaultReplacementPolicy, ReplacementPolicy};
use super::render::{self, PillDrawing, PillStyle, Point, Rect, RenderHost, Size};
use super::storage::{StyledBuffer, DEFAULT_LOOK_BACK};
use super::token::{ReplacementAction, Token, TokenId, UserInteraction};
use super::tokenizer::Tokenizer;

pub struct PillController {
    buffer: StyledBuffer,
    /// Caret (empty) or selection range, in character offsets
    selected_range: Range<usize>,
    /// At most one token is selected; cleared whenever it leaves the buffer
    selected_token: Option<TokenId>,
    policy: Box<dyn ReplacementPolicy>,
    tokenizer: Tokenizer,
    style: PillStyle,
    look_back: usize,
}

impl fmt::Debug for PillController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PillController")
            .field("buffer", &self.buffer)
            .field("selected_range", &self.selected_range)
            .field("selected_token", &self.selected_token)
            .field("style", &self.style)
            .field("look_back", &self.look_back)
            .finish_non_exhaustive()
    }
}

impl Default for PillController {
    fn default() -> Self {
        Self::new(StyledBuffer::new())
    }
}

impl PillController {
    pub fn new(buffer: StyledBuffer) -> Self {
        let end = buffer.len();
        Self {
            buffer,
            selected_range: end..end,
            selected_token: None,
            policy: Box::new(DefaultReplacementPolicy),
            tokenizer: Tokenizer::default(),
            style: PillStyle::default(),
            look_back: DEFAULT_LOOK_BACK,
        }
    }

    pub fn with_policy(mut self, policy: impl ReplacementPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_style(mut self, style: PillStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_look_back(mut self, look_back: usize) -> Self {
        self.look_back = look_back;
        self
    }

    pub fn set_policy(&mut self, policy: impl ReplacementPolicy + 'static) {
        self.policy = Box::new(policy);
    }

    pub fn buffer(&self) -> &StyledBuffer {
        &self.buffer
    }

    pub fn style(&self) -> &PillStyle {
        &self.style
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn selected_range(&self) -> Range<usize> {
        self.selected_range.clone()
    }

    pub fn selected_token(&self) -> Option<TokenId> {
        self.selected_token
    }

    pub fn selected_token_ref(&self) -> Option<&Token> {
        self.selected_token.and_then(|id| self.buffer.token(id))
    }

    pub fn has_selected_token(&self) -> bool {
        self.selected_token.is_some()
    }

    pub fn has_tokens(&self) -> bool {
        self.buffer.has_tokens()
    }

    /// Drain pending edit and redraw notifications for the host.
    pub fn take_edits(&mut self) -> Vec<EditNotification> {
        self.buffer.take_edits()
    }

    /// Mutate the buffer directly. The token selection and caret are
    /// reconciled afterwards.
    pub fn edit_buffer<R>(&mut self, edit: impl FnOnce(&mut StyledBuffer) -> R) -> R {
        let result = edit(&mut self.buffer);
        self.reconcile_selection();
        result
    }

    /// Replace the contents with `text`, parsed for tokens.
    pub fn set_tokenized_text(&mut self, text: &str) {
        self.tokenizer.tokenize_into(&mut self.buffer, text);
        self.reconcile_selection();
    }

    fn reconcile_selection(&mut self) {
        if let Some(id) = self.selected_token {
            match self.buffer.token_range_of(id) {
                // The selection follows the token's slot wherever it moved
                Some(range) => self.selected_range = range,
                None => {
                    tracing::trace!(token = %id, "selected token left the buffer");
                    self.selected_token = None;
                }
            }
        }
        let len = self.buffer.len();
        let start = self.selected_range.start.min(len);
        let end = self.selected_range.end.clamp(start, len);
        self.selected_range = start..end;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn highlight(&mut self, id: TokenId, flag: bool) {
        let Some(range) = self.buffer.token_range_of(id) else {
            return;
        };
        if let Some(token) = self.buffer.token_mut(id) {
            token.set_selected(flag);
        }
        self.buffer.invalidate_display(range);
    }

    /// Select `id`, deselecting any other token, and move the selection range
    /// onto its slot.
    pub fn select_token(&mut self, id: TokenId) {
        if self.selected_token == Some(id) {
            return;
        }
        let Some(range) = self.buffer.token_range_of(id) else {
            tracing::debug!(token = %id, "cannot select a token that is not in the buffer");
            return;
        };
        self.deselect_token();
        self.highlight(id, true);
        self.selected_token = Some(id);
        self.selected_range = range;
        tracing::debug!(token = %id, offset = self.selected_range.start, "token selected");
    }

    /// Deselect the selected token, if there is one.
    pub fn deselect_token(&mut self) {
        if let Some(id) = self.selected_token.take() {
            self.highlight(id, false);
            tracing::debug!(token = %id, "token deselected");
        }
    }

    /// Set the caret/selection range. A range that is exactly one token slot
    /// selects that token; any other range deselects.
    pub fn set_selected_range(&mut self, range: Range<usize>) {
        let exact = self
            .buffer
            .token_exactly_at(range.clone())
            .map(|token| token.id());
        match exact {
            Some(id) => self.select_token(id),
            None => self.deselect_token(),
        }
        self.selected_range = range;
        self.reconcile_selection();
    }

    // =========================================================================
    // Pointer interaction
    // =========================================================================

    /// Pointer press resolved to a character offset by the host.
    ///
    /// `hit` is the character under the pointer (None when the pointer is
    /// not over a glyph); `insertion_point` is where the default behavior
    /// places the caret.
    pub fn pointer_down(
        &mut self,
        hit: Option<usize>,
        insertion_point: usize,
        click_count: u8,
    ) -> EventResult {
        let token = hit
            .and_then(|offset| self.buffer.token_at(offset))
            .map(|token| token.id());
        let Some(id) = token else {
            self.deselect_token();
            self.selected_range = insertion_point..insertion_point;
            self.reconcile_selection();
            return EventResult::Default;
        };

        if self.selected_token != Some(id) {
            self.select_token(id);
        } else if click_count > 1 {
            self.handle_interaction(UserInteraction::DoubleClick, id);
        }
        EventResult::Consumed
    }

    /// Pointer press in container coordinates, resolved through the host.
    pub fn mouse_down(
        &mut self,
        host: &impl RenderHost,
        point: Point,
        click_count: u8,
    ) -> EventResult {
        let hit = host.character_index_at(point);
        let insertion_point = host.insertion_point_at(point);
        self.pointer_down(hit, insertion_point, click_count)
    }

    // =========================================================================
    // Key actions
    // =========================================================================

    pub fn handle(&mut self, action: PillAction) -> EventResult {
        match action {
            PillAction::MoveLeft => self.move_left(),
            PillAction::MoveRight => self.move_right(),
            PillAction::InsertTab => self.insert_tab(),
            PillAction::InsertNewline => self.insert_newline(),
            PillAction::DeleteBackward => self.delete_backward(),
            PillAction::InsertText(text) => {
                self.insert_text(&text);
                EventResult::Default
            }
        }
    }

    /// Move left. A selected token is deselected and the caret lands on its
    /// left side; a token just left of the caret is selected instead of
    /// being stepped over.
    pub fn move_left(&mut self) -> EventResult {
        if self.selected_token.is_some() {
            self.deselect_token();
        } else if self.selected_range.is_empty() {
            let previous = self
                .selected_range
                .start
                .checked_sub(1)
                .and_then(|offset| self.buffer.token_at(offset))
                .map(|token| token.id());
            if let Some(id) = previous {
                self.select_token(id);
                return EventResult::Consumed;
            }
        }
        self.move_caret_left();
        EventResult::Default
    }

    /// Move right; mirror image of [`Self::move_left`].
    pub fn move_right(&mut self) -> EventResult {
        if self.selected_token.is_some() {
            self.deselect_token();
        } else if self.selected_range.is_empty() {
            let next = self
                .buffer
                .token_at(self.selected_range.start)
                .map(|token| token.id());
            if let Some(id) = next {
                self.select_token(id);
                return EventResult::Consumed;
            }
        }
        self.move_caret_right();
        EventResult::Default
    }

    fn move_caret_left(&mut self) {
        let caret = if self.selected_range.is_empty() {
            self.selected_range.start.saturating_sub(1)
        } else {
            self.selected_range.start
        };
        self.selected_range = caret..caret;
    }

    fn move_caret_right(&mut self) {
        let caret = if self.selected_range.is_empty() {
            (self.selected_range.end + 1).min(self.buffer.len())
        } else {
            self.selected_range.end
        };
        self.selected_range = caret..caret;
    }

    /// Tab cycles through tokens; with no tokens at all a tab is inserted.
    pub fn insert_tab(&mut self) -> EventResult {
        if let Some(id) = self.selected_token {
            let next = self
                .buffer
                .token_following(id, true)
                .map(|token| token.id());
            if let Some(next) = next {
                self.select_token(next);
            }
            return EventResult::Consumed;
        }

        let closest = self
            .buffer
            .closest_token_following_or_at(self.selected_range.start, self.look_back, true)
            .map(|token| token.id());
        match closest {
            Some(id) => {
                self.select_token(id);
                EventResult::Consumed
            }
            None => {
                self.insert_text("\t");
                EventResult::Default
            }
        }
    }

    pub fn insert_newline(&mut self) -> EventResult {
        match self.selected_token {
            Some(id) => {
                self.handle_interaction(UserInteraction::Enter, id);
                EventResult::Consumed
            }
            None => {
                self.insert_text("\n");
                EventResult::Default
            }
        }
    }

    pub fn delete_backward(&mut self) -> EventResult {
        if let Some(id) = self.selected_token {
            self.handle_interaction(UserInteraction::Delete, id);
            return EventResult::Consumed;
        }

        let range = self.selected_range.clone();
        if !range.is_empty() {
            self.replace_selection("");
        } else if range.start > 0 {
            self.selected_range = range.start - 1..range.start;
            self.replace_selection("");
        }
        EventResult::Default
    }

    /// Replace the selection with literal text (no tokenization).
    pub fn insert_text(&mut self, text: &str) {
        self.replace_selection(text);
    }

    fn replace_selection(&mut self, text: &str) {
        let start = self.selected_range.start;
        self.buffer
            .replace_characters(self.selected_range.clone(), text);
        let caret = start + text.chars().count();
        self.selected_range = caret..caret;
        self.reconcile_selection();
    }

    // =========================================================================
    // Replacement
    // =========================================================================

    /// Ask the policy what to do with `id` and do it.
    pub fn handle_interaction(
        &mut self,
        interaction: UserInteraction,
        id: TokenId,
    ) -> Option<ReplacementAction> {
        let token = self.buffer.token(id)?;
        let action = self.policy.decide_replacement_action(interaction, token);
        tracing::debug!(token = %id, ?interaction, ?action, "token interaction");
        match action {
            ReplacementAction::Insert => {
                self.insert_text_for(id);
            }
            ReplacementAction::Delete => {
                self.delete_token(id);
            }
            ReplacementAction::Ignore => {}
        }
        Some(action)
    }

    /// Replace the token with an empty string.
    pub fn delete_token(&mut self, id: TokenId) -> bool {
        let Some(range) = self.buffer.token_range_of(id) else {
            return false;
        };
        if self.selected_token == Some(id) {
            self.selected_token = None;
        }
        self.buffer.delete_characters(range.clone());
        self.selected_range = range.start..range.start;
        self.reconcile_selection();
        true
    }

    /// Replace the token with its content text.
    pub fn insert_text_for(&mut self, id: TokenId) -> bool {
        let Some(range) = self.buffer.token_range_of(id) else {
            return false;
        };
        let Some(content) = self
            .buffer
            .token(id)
            .map(|token| token.content_text().to_string())
        else {
            return false;
        };
        if self.selected_token == Some(id) {
            self.selected_token = None;
        }
        self.buffer.replace_characters(range.clone(), &content);
        let caret = range.start + content.chars().count();
        self.selected_range = caret..caret;
        self.reconcile_selection();
        true
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Plain-text payload for the current selection; tokens become their
    /// content text.
    pub fn copy_selection(&self) -> String {
        self.buffer.plain_text(self.selected_range.clone())
    }

    /// Copy the selection, then remove it.
    pub fn cut_selection(&mut self) -> String {
        let payload = self.copy_selection();
        if !self.selected_range.is_empty() {
            self.replace_selection("");
        }
        payload
    }

    // =========================================================================
    // Formatting and drawing
    // =========================================================================

    /// Change the token font and invalidate every token for relayout.
    pub fn change_font(&mut self, font: Font) {
        self.style.font = font;
        for range in render::token_ranges(&self.buffer) {
            self.buffer.invalidate_display(range);
        }
    }

    pub fn set_style(&mut self, style: PillStyle) {
        self.style = style;
        for range in render::token_ranges(&self.buffer) {
            self.buffer.invalidate_display(range);
        }
    }

    /// Apply a paragraph style to the whole buffer, tokens included.
    pub fn set_default_paragraph_style(&mut self, style: ParagraphStyle) {
        self.buffer
            .add_attribute_to_all(Attribute::ParagraphStyle(style));
    }

    pub fn cell_size(&self, id: TokenId, host: &impl RenderHost) -> Option<Size> {
        let token = self.buffer.token(id)?;
        Some(render::cell_size(token, host, &self.style))
    }

    pub fn layout_token(
        &self,
        id: TokenId,
        cell_frame: Rect,
        line_height: f32,
        baseline: f32,
        host: &impl RenderHost,
    ) -> Option<PillDrawing> {
        let token = self.buffer.token(id)?;
        Some(render::layout_pill(
            token,
            cell_frame,
            line_height,
            baseline,
            host,
            &self.style,
        ))
    }
}
