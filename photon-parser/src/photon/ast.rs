//! Abstract syntax tree
//!
//!     The tree is a closed set of tagged unions: [Node] for statements and [Expr] for
//!     expressions. Every variant reports its opcode name, which is what diagnostics and the
//!     transpiler print when they need to name a construct.
//!
//!     A [TranslationUnit] is the ordered list of top-level nodes of one source file. It is
//!     built once by the parsing pipeline and not mutated afterwards.

pub mod error;
pub mod expr;
pub mod node;

use serde::Serialize;

pub use error::{AttachError, ParseError, SyntaxError};
pub use expr::{Arg, Expr, RangeExpr, StrLiteral, StrPart};
pub use node::{
    Assign, AugAssign, ClassStatement, Comment, Declare, DefStatement, DelStatement, ElifClause,
    ElifStatement, ElseStatement, ExprStatement, ForIter, ForStatement, IfStatement,
    ImportStatement, Node, Param, ReturnStatement, Target, WhileStatement,
};

/// The top-level statements of one source file, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationUnit {
    pub file: String,
    pub nodes: Vec<Node>,
}

impl TranslationUnit {
    pub fn new(file: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            file: file.into(),
            nodes,
        }
    }

    /// Unit name derived from the file name (`src/util.w` -> `util`).
    pub fn name(&self) -> &str {
        let file = self.file.rsplit(['/', '\\']).next().unwrap_or(&self.file);
        file.strip_suffix(".w").unwrap_or(file)
    }
}
