//! Inline tokens ("pills") embedded in styled text.
//!
//! A token occupies exactly one character slot of a [`StyledBuffer`]. The
//! [`Tokenizer`] turns delimited substrings into tokens, the
//! [`PillController`] handles navigation and selection, and the render
//! adapter describes how a host draws each token.

pub mod attributes;
pub mod controller;
pub mod messages;
pub mod policy;
pub mod render;
pub mod storage;
pub mod token;
pub mod tokenizer;

pub use attributes::{Attribute, AttributeKey, Font, ParagraphStyle, TextAttributes};
pub use controller::PillController;
pub use messages::{EditKind, EditNotification, EventResult, PillAction};
pub use policy::{DefaultReplacementPolicy, ReplacementPolicy};
pub use render::{PillDrawing, PillStyle, Point, Rect, RenderHost, Size};
pub use storage::{Replacement, StyledBuffer, DEFAULT_LOOK_BACK, TOKEN_PLACEHOLDER};
pub use token::{ReplacementAction, Token, TokenId, TokenLabel, UserInteraction};
pub use tokenizer::{PatternError, TokenizedString, Tokenizer, DEFAULT_PATTERN};
