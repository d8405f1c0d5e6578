//! Error types for hilite

use thiserror::Error;

/// Result type alias for hilite operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Unknown language: {0:?}")]
    UnknownLanguage(String),

    #[error("Grammar already registered: {0:?}")]
    DuplicateName(String),

    #[error("Illegal lexeme {lexeme:?} for mode {mode:?}")]
    IllegalLexeme { lexeme: String, mode: String },

    #[error("Invalid pattern {pattern:?} in grammar {grammar:?}: {source}")]
    InvalidPattern {
        grammar: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid grammar definition: {0}")]
    InvalidGrammar(String),

    #[error("Grammar document error: {0}")]
    GrammarFile(#[from] toml::de::Error),
}
