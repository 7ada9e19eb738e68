//! VEX Error Types
//!
//! Tokenization and structural failures, each carrying the originating
//! source line (1-indexed). Both kinds are fatal: parsing aborts on the
//! first error and produces no partial document.

use thiserror::Error;

/// Errors produced while lexing or parsing a VEX file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VexError {
    /// A single line (or accumulated multi-line statement) could not be
    /// tokenized: unterminated statement at end of input, malformed
    /// header, unrecognized line shape.
    #[error("lex error at line {line}: {message}")]
    Lex { line: usize, message: String },

    /// The token sequence violated VEX nesting rules: unmatched closer,
    /// unterminated group, duplicate name, entry in the wrong scope.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl VexError {
    /// Lex error at the given line
    pub fn lex(message: impl Into<String>, line: usize) -> Self {
        VexError::Lex {
            line,
            message: message.into(),
        }
    }

    /// Parse error at the given line
    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        VexError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Source line the error originated at (1-indexed)
    pub fn line(&self) -> usize {
        match self {
            VexError::Lex { line, .. } | VexError::Parse { line, .. } => *line,
        }
    }

    /// Human-readable description, without the line prefix
    pub fn message(&self) -> &str {
        match self {
            VexError::Lex { message, .. } | VexError::Parse { message, .. } => message,
        }
    }

    /// True for tokenization failures
    pub fn is_lex(&self) -> bool {
        matches!(self, VexError::Lex { .. })
    }

    /// True for structural failures
    pub fn is_parse(&self) -> bool {
        matches!(self, VexError::Parse { .. })
    }
}

/// Result type alias for VEX operations
pub type VexResult<T> = Result<T, VexError>;
