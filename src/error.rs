//! Diagnostics reported while compiling a source text.
//!
//! Diagnostics are a side channel: they are accumulated and returned next to
//! the compiled program, never mixed into the instruction stream, and none of
//! them aborts compilation.

/// A single problem found in the source text.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A character the lexer cannot classify. The character is skipped and
    /// scanning continues.
    #[error("illegal character '{ch}' on line {line}")]
    IllegalCharacter { ch: char, line: usize },

    /// A token that fits no grammar production. The token is discarded and
    /// parsing resumes at the next one.
    #[error("syntax error at '{lexeme}' on line {line}")]
    SyntaxError { lexeme: String, line: usize },

    /// The input ended in the middle of a construct, e.g. a procedure
    /// definition missing its `end` or an unterminated string.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// The classification of a [`Diagnostic`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    IllegalCharacter,
    SyntaxError,
    UnexpectedEndOfInput,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::IllegalCharacter { .. } => DiagnosticKind::IllegalCharacter,
            Diagnostic::SyntaxError { .. } => DiagnosticKind::SyntaxError,
            Diagnostic::UnexpectedEndOfInput => DiagnosticKind::UnexpectedEndOfInput,
        }
    }

    /// The source line the diagnostic points at, where one is available.
    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::IllegalCharacter { line, .. } => Some(*line),
            Diagnostic::SyntaxError { line, .. } => Some(*line),
            Diagnostic::UnexpectedEndOfInput => None,
        }
    }
}
