//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use pill::pill::{PillController, StyledBuffer, TokenId, Tokenizer};

/// Tokenize `text` with the default `<...>` pattern
pub fn tokenized(text: &str) -> StyledBuffer {
    Tokenizer::default().tokenize(text)
}

/// Controller over tokenized `text` with the caret at `caret`
pub fn controller_at(text: &str, caret: usize) -> PillController {
    let mut controller = PillController::default();
    controller.set_tokenized_text(text);
    controller.set_selected_range(caret..caret);
    controller.take_edits();
    controller
}

/// `(offset, content)` for every token, in offset order
pub fn token_contents(buffer: &StyledBuffer) -> Vec<(usize, String)> {
    buffer
        .iter_tokens()
        .map(|(offset, token)| (offset, token.content_text().to_string()))
        .collect()
}

/// Id of the token at `offset`; panics if there is none
pub fn token_id_at(buffer: &StyledBuffer, offset: usize) -> TokenId {
    buffer
        .token_at(offset)
        .unwrap_or_else(|| panic!("expected a token at offset {}", offset))
        .id()
}

/// Offset of the selected token, if any
pub fn selected_offset(controller: &PillController) -> Option<usize> {
    controller
        .selected_token()
        .and_then(|id| controller.buffer().token_index_of(id))
}

/// Number of tokens currently flagged as selected
pub fn selected_count(buffer: &StyledBuffer) -> usize {
    buffer
        .iter_tokens()
        .filter(|(_, token)| token.is_selected())
        .count()
}
