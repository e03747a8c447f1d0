//! Statement nodes
//!
//!     One [Node] is produced per source statement. Block-owning statements carry their body
//!     in an `Option<Vec<Node>>`: `None` until the assembler attaches the indented lines that
//!     follow, which is how a double attachment is detected. Conditional chains are built by
//!     the assembler folding `elif`/`else` modifier nodes into the owning [IfStatement].

use serde::Serialize;

use super::expr::{Expr, RangeExpr};
use crate::photon::token::{Operator, TypeName};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "opcode", rename_all = "camelCase")]
pub enum Node {
    Assign(Assign),
    AugAssign(AugAssign),
    #[serde(rename = "varInit")]
    Declare(Declare),
    #[serde(rename = "expression")]
    Expression(ExprStatement),
    #[serde(rename = "ifStatement")]
    If(IfStatement),
    #[serde(rename = "elifStatement")]
    Elif(ElifStatement),
    #[serde(rename = "elseStatement")]
    Else(ElseStatement),
    #[serde(rename = "whileStatement")]
    While(WhileStatement),
    #[serde(rename = "forStatement")]
    For(ForStatement),
    #[serde(rename = "defStatement")]
    Def(DefStatement),
    #[serde(rename = "classStatement")]
    Class(ClassStatement),
    Return(ReturnStatement),
    Break,
    Continue,
    Import(ImportStatement),
    #[serde(rename = "delete")]
    Del(DelStatement),
    Comment(Comment),
}

/// Left-hand side of an assignment or `del`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Target {
    Var {
        name: String,
        #[serde(rename = "type")]
        declared: Option<TypeName>,
    },
    DotAccess {
        path: Vec<String>,
    },
    Index {
        base: Expr,
        index: Expr,
    },
}

impl Target {
    pub fn var(name: impl Into<String>) -> Self {
        Target::Var {
            name: name.into(),
            declared: None,
        }
    }

    /// The expression reading the same location.
    pub fn to_expr(&self) -> Expr {
        match self {
            Target::Var { name, .. } => Expr::var(name.clone()),
            Target::DotAccess { path } => Expr::DotAccess { path: path.clone() },
            Target::Index { base, index } => Expr::Index {
                base: Box::new(base.clone()),
                index: Box::new(index.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub target: Target,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugAssign {
    pub target: Target,
    pub op: Operator,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declare {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStatement {
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElifClause {
    pub expr: Expr,
    pub block: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub expr: Expr,
    pub block: Option<Vec<Node>>,
    pub elifs: Vec<ElifClause>,
    #[serde(rename = "else")]
    pub else_block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElifStatement {
    pub expr: Expr,
    pub block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseStatement {
    pub block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub expr: Expr,
    pub block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ForIter {
    Range(RangeExpr),
    Each(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    pub var: String,
    pub iter: ForIter,
    pub block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub declared: Option<TypeName>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefStatement {
    pub name: String,
    #[serde(rename = "type")]
    pub return_type: Option<TypeName>,
    pub params: Vec<Param>,
    pub block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStatement {
    pub name: String,
    pub parent: Option<String>,
    pub block: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub expr: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportStatement {
    pub path: Vec<String>,
    pub alias: Option<String>,
}

impl ImportStatement {
    pub fn module(&self) -> String {
        self.path.join(".")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelStatement {
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
}

impl Node {
    pub fn opcode(&self) -> &'static str {
        match self {
            Node::Assign(_) => "assign",
            Node::AugAssign(_) => "augAssign",
            Node::Declare(_) => "varInit",
            Node::Expression(stmt) => stmt.expr.opcode(),
            Node::If(_) => "ifStatement",
            Node::Elif(_) => "elifStatement",
            Node::Else(_) => "elseStatement",
            Node::While(_) => "whileStatement",
            Node::For(_) => "forStatement",
            Node::Def(_) => "defStatement",
            Node::Class(_) => "classStatement",
            Node::Return(_) => "return",
            Node::Break => "break",
            Node::Continue => "continue",
            Node::Import(_) => "import",
            Node::Del(_) => "delete",
            Node::Comment(_) => "comment",
        }
    }

    /// Nodes that attach to a preceding `if` instead of standing alone.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Node::Elif(_) | Node::Else(_))
    }

    /// The body slot of block-owning nodes.
    pub fn block_slot(&mut self) -> Option<&mut Option<Vec<Node>>> {
        match self {
            Node::If(n) => Some(&mut n.block),
            Node::Elif(n) => Some(&mut n.block),
            Node::Else(n) => Some(&mut n.block),
            Node::While(n) => Some(&mut n.block),
            Node::For(n) => Some(&mut n.block),
            Node::Def(n) => Some(&mut n.block),
            Node::Class(n) => Some(&mut n.block),
            _ => None,
        }
    }

    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            Node::If(_)
                | Node::Elif(_)
                | Node::Else(_)
                | Node::While(_)
                | Node::For(_)
                | Node::Def(_)
                | Node::Class(_)
        )
    }

    /// The attached body, if any.
    pub fn block(&self) -> Option<&[Node]> {
        let block = match self {
            Node::If(n) => &n.block,
            Node::Elif(n) => &n.block,
            Node::Else(n) => &n.block,
            Node::While(n) => &n.block,
            Node::For(n) => &n.block,
            Node::Def(n) => &n.block,
            Node::Class(n) => &n.block,
            _ => return None,
        };
        block.as_deref()
    }
}
