use crate::parser::token::TokenKind;

/// Errors from the lexer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected input {found:?} at byte {offset}")]
    UnexpectedToken { offset: usize, found: String },

    #[error("unexpected end of input in {construct} starting at byte {offset}")]
    UnexpectedEndOfInput {
        offset: usize,
        construct: &'static str,
    },
}

impl LexError {
    /// Byte offset where scanning stopped.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedToken { offset, .. } => *offset,
            LexError::UnexpectedEndOfInput { offset, .. } => *offset,
        }
    }
}

/// Errors from the declaration parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {kind} token '{text}'")]
    UnexpectedToken { kind: TokenKind, text: String },

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// Top-level error type that wraps all sub-errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type alias for eureka operations.
pub type Result<T> = std::result::Result<T, Error>;
