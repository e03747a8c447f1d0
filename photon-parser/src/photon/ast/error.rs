//! Parse errors
//!
//!     Every failure of the lex / reduce / assemble pipeline surfaces as a [SyntaxError]
//!     carrying the file name, the 1-based line number, the raw line and, when the reducer
//!     got that far, a re-serialization of the phrase it was stuck on. There is no LexError:
//!     the lexer classifies anything it does not recognize as an identifier.

use thiserror::Error;

use crate::photon::token::SourceContext;

/// A single syntax error report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "SyntaxError: {message}\n  --> {file}:{line_number}\n   | {line}{}",
    phrase_suffix(.phrase)
)]
pub struct SyntaxError {
    pub message: String,
    pub file: String,
    pub line_number: usize,
    pub line: String,
    pub phrase: Option<String>,
}

impl SyntaxError {
    /// An error on the given line, without a phrase.
    pub fn at(context: SourceContext<'_>, message: impl Into<String>) -> Self {
        SyntaxError {
            message: message.into(),
            file: context.file.to_string(),
            line_number: context.line_number,
            line: context.line.to_string(),
            phrase: None,
        }
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = Some(phrase.into());
        self
    }
}

fn phrase_suffix(phrase: &Option<String>) -> String {
    match phrase {
        Some(phrase) => format!("\n   = last parse attempt: {}", phrase),
        None => String::new(),
    }
}

/// Violations of the block / modifier ownership rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("`{0}` already has a block attached")]
    DoubleBlock(&'static str),
    #[error("`{0}` cannot own an indented block")]
    NotBlockOwner(&'static str),
    #[error("`{modifier}` must follow an `if` statement, found `{owner}`")]
    NotModifierOwner {
        modifier: &'static str,
        owner: &'static str,
    },
    #[error("`if` statement already has an `else` clause")]
    DoubleElse,
    #[error("`elif` cannot follow an `else` clause")]
    ElifAfterElse,
    #[error("modifier `{0}` is not implemented")]
    UnknownModifier(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// A builder received a window that contradicts its rule's pattern.
    #[error("internal parser error: {0}")]
    Internal(String),
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl ParseError {
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}
