//! Property-based tests for tokenized buffers.
//!
//! These tests use proptest to generate random inputs and edit sequences and
//! verify:
//! 1. Round-trip: tokenizing then rendering tokens as content gives back the
//!    text with delimiters removed
//! 2. Offsets are unique and point back at their tokens
//! 3. The cached token index always equals a full rescan
//! 4. At most one token is ever selected

mod common;

use common::selected_count;
use pill::pill::{Attribute, PillAction, PillController, StyledBuffer, Token, Tokenizer};
use pill::theme::Color;
use proptest::prelude::*;

// -- Strategies --

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Token(String),
}

fn segment_strategy() -> impl Strategy<Value = Segment> {
    prop_oneof![
        "[a-z ,.!é]{1,8}".prop_map(Segment::Text),
        "[a-zA-Z0-9 ]{0,6}".prop_map(Segment::Token),
    ]
}

#[derive(Debug, Clone)]
enum Edit {
    Insert(usize, String),
    Delete(usize, usize),
    InsertToken(usize),
    Attribute(usize, usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), "[a-z]{0,4}").prop_map(|(at, text)| Edit::Insert(at, text)),
        (any::<usize>(), 0usize..4).prop_map(|(at, len)| Edit::Delete(at, len)),
        any::<usize>().prop_map(Edit::InsertToken),
        (any::<usize>(), 0usize..6).prop_map(|(at, len)| Edit::Attribute(at, len)),
    ]
}

fn action_strategy() -> impl Strategy<Value = PillAction> {
    prop_oneof![
        Just(PillAction::MoveLeft),
        Just(PillAction::MoveRight),
        Just(PillAction::InsertTab),
        Just(PillAction::InsertNewline),
        Just(PillAction::DeleteBackward),
        "[a-z]{1,2}".prop_map(PillAction::InsertText),
    ]
}

fn apply(buffer: &mut StyledBuffer, edit: &Edit) {
    let len = buffer.len();
    match edit {
        Edit::Insert(at, text) => buffer.insert_text(at % (len + 1), text),
        Edit::Delete(at, n) => {
            let start = at % (len + 1);
            buffer.delete_characters(start..(start + n).min(len));
        }
        Edit::InsertToken(at) => buffer.insert_token(Token::new("t"), at % (len + 1)),
        Edit::Attribute(at, n) => {
            let start = at % (len + 1);
            buffer.add_attribute(
                Attribute::ForegroundColor(Color::rgb(9, 9, 9)),
                start..(start + n).min(len),
            );
        }
    }
}

// -- Properties --

proptest! {
    #[test]
    fn tokenize_round_trips_to_plain_text(segments in prop::collection::vec(segment_strategy(), 0..12)) {
        let mut source = String::new();
        let mut expected = String::new();
        let mut expected_tokens = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Text(text) => {
                    source.push_str(text);
                    expected.push_str(text);
                }
                Segment::Token(content) => {
                    source.push_str(&format!("<{}>", content));
                    expected.push_str(content);
                    expected_tokens.push(content.clone());
                }
            }
        }

        let buffer = Tokenizer::default().tokenize(&source);
        prop_assert_eq!(buffer.plain_text(0..buffer.len()), expected);
        let contents: Vec<String> = buffer
            .iter_tokens()
            .map(|(_, token)| token.content_text().to_string())
            .collect();
        prop_assert_eq!(contents, expected_tokens);
    }

    #[test]
    fn token_offsets_are_unique(segments in prop::collection::vec(segment_strategy(), 0..12)) {
        let source: String = segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.clone(),
                Segment::Token(content) => format!("<{}>", content),
            })
            .collect();
        let buffer = Tokenizer::default().tokenize(&source);

        let mut offsets: Vec<usize> = buffer.tokens().values().copied().collect();
        let total = offsets.len();
        offsets.sort_unstable();
        offsets.dedup();
        prop_assert_eq!(offsets.len(), total);
        for (id, offset) in buffer.tokens() {
            prop_assert_eq!(buffer.token_at(*offset).map(|t| t.id()), Some(*id));
        }
    }

    #[test]
    fn cached_index_matches_rescan(
        text in "[a-z<> ]{0,20}",
        edits in prop::collection::vec(edit_strategy(), 0..20),
    ) {
        let mut buffer = Tokenizer::default().tokenize(&text);
        for edit in &edits {
            apply(&mut buffer, edit);
            let cached = buffer.tokens().clone();
            prop_assert_eq!(cached, buffer.scan_tokens());
        }
    }

    #[test]
    fn at_most_one_token_selected(
        text in "[a-z <>]{0,20}",
        actions in prop::collection::vec(action_strategy(), 0..30),
    ) {
        let mut controller = PillController::default();
        controller.set_tokenized_text(&text);
        controller.set_selected_range(0..0);
        for action in actions {
            controller.handle(action);
            let count = selected_count(controller.buffer());
            prop_assert!(count <= 1);
            prop_assert_eq!(count == 1, controller.has_selected_token());
            let range = controller.selected_range();
            prop_assert!(range.end <= controller.buffer().len());
        }
    }
}
