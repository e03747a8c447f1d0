//! Parsing
//!
//!     Statement-level parsing of single lines. A line is tokenized by the
//!     [lexer](crate::photon::lexing) and folded into one [Node] by the reduction
//!     [engine] running the [grammar] table. Nothing in here knows about indentation: lines are
//!     parsed independently and nested afterwards by the
//!     [assembling](crate::photon::assembling) stage.
//!
//!     Diagnostics need the file name, line number and raw text of the line being parsed.
//!     That context is passed explicitly as a [SourceContext] value rather than kept in any
//!     shared state.

pub mod builders;
pub mod engine;
pub mod grammar;

pub use engine::{Builder, Reducer, Rule, Window};
pub use grammar::GRAMMAR_RULES;

use crate::photon::ast::{Expr, Node, ParseError, SyntaxError};
use crate::photon::lexing::tokenize;
use crate::photon::token::{SourceContext, Token};

/// Reduce a tokenized line with the standard grammar.
pub fn reduce(tokens: Vec<Token>, context: SourceContext<'_>) -> Result<Node, ParseError> {
    Reducer::new(GRAMMAR_RULES).reduce(tokens, context)
}

/// Tokenize and reduce one line of source.
pub fn parse_line(line: &str, context: SourceContext<'_>) -> Result<Node, ParseError> {
    reduce(tokenize(line), context)
}

/// Parse a standalone expression, e.g. the inside of a string placeholder.
pub fn parse_expression(source: &str, context: SourceContext<'_>) -> Result<Expr, ParseError> {
    match reduce(tokenize(source), context)? {
        Node::Expression(stmt) => Ok(stmt.expr),
        other => Err(SyntaxError::at(
            context,
            format!("expected an expression, found `{}`", other.opcode()),
        )
        .with_phrase(source.trim())
        .into()),
    }
}
