//! Pill - inline tokens embedded in editable text
//!
//! This crate provides the token model, the styled text storage that embeds
//! tokens as single character slots, a regex tokenizer, and the navigation and
//! selection controller that makes tokens behave as atomic units.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod pill;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::PillConfig;
pub use pill::{PillController, StyledBuffer, Token, TokenId, Tokenizer};
pub use theme::TokenTheme;
