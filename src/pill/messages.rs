//! Message types exchanged between the host and the pill core.

use std::ops::Range;

/// Abstract key actions the host maps raw key events onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PillAction {
    /// Move one character left
    MoveLeft,
    /// Move one character right
    MoveRight,
    /// Tab key
    InsertTab,
    /// Enter/Return key
    InsertNewline,
    /// Backspace
    DeleteBackward,
    /// Typed or pasted text (never tokenized implicitly)
    InsertText(String),
}

impl PillAction {
    /// Check if this action may modify the buffer
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            PillAction::InsertTab
                | PillAction::InsertNewline
                | PillAction::DeleteBackward
                | PillAction::InsertText(_)
        )
    }

    /// Check if this action is a caret movement
    pub fn is_movement(&self) -> bool {
        matches!(self, PillAction::MoveLeft | PillAction::MoveRight)
    }
}

/// Whether token logic consumed an event or the default editing behavior ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Token selection or replacement handled the event
    Consumed,
    /// Default text-editing behavior was applied
    Default,
}

impl EventResult {
    pub fn is_consumed(self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// What an edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Characters were replaced (length may have changed)
    Characters,
    /// Only attributes changed
    Attributes,
    /// Nothing changed in the buffer, the range only needs redrawing
    Display,
}

/// Notification the rendering layer uses to invalidate screen regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditNotification {
    pub kind: EditKind,
    /// Affected range in post-edit offsets
    pub range: Range<usize>,
    pub change_in_length: isize,
}

impl EditNotification {
    pub fn characters(range: Range<usize>, change_in_length: isize) -> Self {
        Self {
            kind: EditKind::Characters,
            range,
            change_in_length,
        }
    }

    pub fn attributes(range: Range<usize>) -> Self {
        Self {
            kind: EditKind::Attributes,
            range,
            change_in_length: 0,
        }
    }

    pub fn display(range: Range<usize>) -> Self {
        Self {
            kind: EditKind::Display,
            range,
            change_in_length: 0,
        }
    }
}
