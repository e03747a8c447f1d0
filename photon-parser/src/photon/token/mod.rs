//! Core token types and helpers shared across the lexer, reducer and assembler.

pub mod core;
pub mod formatting;
pub mod line;
pub mod to_line_container;

pub use core::{Assoc, Builtin, Keyword, Kind, Operator, Symbol, Token, TypeName};
pub use formatting::{phrase, ToPhrase};
pub use line::{LineContainer, LineStream, LineTree, SourceContext, SourceFile, SourceLine};
pub use to_line_container::build_line_container;
