//! Command-line argument parsing for the demo binary
//!
//! Supports:
//! - Tokenizing text with a custom delimiter pattern and theme
//! - Replaying navigation keys against the tokenized text
//! - JSON output of the resulting state

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pill::PillAction;

/// Tokenize text into inline pills and replay key actions against it
#[derive(Parser, Debug)]
#[command(name = "pill", version, about = "Inline token playground")]
pub struct CliArgs {
    /// Text to tokenize, e.g. "Hey <Xcode>, check out my <pills>!"
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Delimiter pattern; capture group 1 is the token content
    #[arg(short, long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Token theme id
    #[arg(short, long, value_name = "ID")]
    pub theme: Option<String>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Comma-separated keys to replay, starting with the caret at offset 0
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub actions: Vec<KeyArg>,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// A key the demo can replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyArg {
    Left,
    Right,
    Tab,
    Enter,
    Delete,
}

impl From<KeyArg> for PillAction {
    fn from(key: KeyArg) -> Self {
        match key {
            KeyArg::Left => PillAction::MoveLeft,
            KeyArg::Right => PillAction::MoveRight,
            KeyArg::Tab => PillAction::InsertTab,
            KeyArg::Enter => PillAction::InsertNewline,
            KeyArg::Delete => PillAction::DeleteBackward,
        }
    }
}

impl CliArgs {
    /// Key actions in replay order
    pub fn pill_actions(&self) -> Vec<PillAction> {
        self.actions.iter().copied().map(PillAction::from).collect()
    }
}
