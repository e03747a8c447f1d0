//! Statement builders
//!
//! Every statement must cover the whole line; a statement-shaped window with tokens on
//! either side is declined so the surrounding tokens get a chance to reduce first.

use super::{decline, expr_at, operator_at, statement, var_at, Built};
use crate::photon::ast::{
    Arg, Assign, AugAssign, ClassStatement, Comment, Declare, DefStatement, DelStatement,
    ElifStatement, ElseStatement, Expr, ExprStatement, ForIter, ForStatement, IfStatement,
    ImportStatement, Node, Param, ParseError, RangeExpr, ReturnStatement, Target,
    WhileStatement,
};
use crate::photon::parsing::engine::Window;
use crate::photon::token::{Keyword, Token};

/// `# text`
pub fn comment(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let text = match window.matched() {
        [_, Token::Text(text)] => text.clone(),
        [_] => String::new(),
        _ => return Err(window.mismatch("comment")),
    };
    statement(Node::Comment(Comment { text }))
}

/// `import a`, `import a.b`, with an optional `as alias`.
pub fn import(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let path = match window.get(1) {
        Token::Var { name, .. } => vec![name.clone()],
        Token::DotAccess(path) => path.clone(),
        _ => return Err(window.mismatch("import")),
    };
    let alias = match window.len {
        2 => None,
        4 => Some(var_at(window, 3, "import")?.0),
        _ => return Err(window.mismatch("import")),
    };
    statement(Node::Import(ImportStatement { path, alias }))
}

/// `class Name:` / `class Name(Parent):`
pub fn class(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let (name, _) = var_at(window, 1, "class")?;
    let parent = match window.len {
        3 => None,
        6 => Some(var_at(window, 3, "class")?.0),
        _ => return Err(window.mismatch("class")),
    };
    statement(Node::Class(ClassStatement {
        name,
        parent,
        block: None,
    }))
}

/// `int x` on its own line.
pub fn declaration(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    match var_at(window, 0, "declaration")? {
        (name, Some(ty)) => statement(Node::Declare(Declare { name, ty })),
        (_, None) => decline(),
    }
}

pub fn else_clause(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    statement(Node::Else(ElseStatement { block: None }))
}

/// `break`, `continue` and a bare `return`.
pub fn keyword_only(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let node = match window.get(0) {
        Token::Keyword(Keyword::Break) => Node::Break,
        Token::Keyword(Keyword::Continue) => Node::Continue,
        Token::Keyword(Keyword::Return) => Node::Return(ReturnStatement { expr: None }),
        _ => return Err(window.mismatch("keyword_only")),
    };
    statement(node)
}

pub fn return_value(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let expr = expr_at(window, 1, "return")?;
    statement(Node::Return(ReturnStatement { expr: Some(expr) }))
}

fn target_at(window: &Window<'_>, i: usize, rule: &str) -> Result<Target, ParseError> {
    match window.get(i) {
        Token::Var { name, declared } => Ok(Target::Var {
            name: name.clone(),
            declared: *declared,
        }),
        Token::DotAccess(path) => Ok(Target::DotAccess { path: path.clone() }),
        Token::IndexAccess(Expr::Index { base, index }) => Ok(Target::Index {
            base: (**base).clone(),
            index: (**index).clone(),
        }),
        _ => Err(window.mismatch(rule)),
    }
}

/// `target = expr`
pub fn assign(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let target = target_at(window, 0, "assign")?;
    let expr = expr_at(window, 2, "assign")?;
    statement(Node::Assign(Assign { target, expr }))
}

/// `target op= expr`
pub fn aug_assign(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let target = target_at(window, 0, "aug_assign")?;
    let op = operator_at(window, 1, "aug_assign")?;
    let expr = expr_at(window, 2, "aug_assign")?;
    statement(Node::AugAssign(AugAssign { target, op, expr }))
}

/// `if expr:`, `elif expr:`, `while expr:`
pub fn conditional(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let expr = expr_at(window, 1, "conditional")?;
    let node = match window.get(0) {
        Token::Keyword(Keyword::If) => Node::If(IfStatement {
            expr,
            block: None,
            elifs: Vec::new(),
            else_block: None,
        }),
        Token::Keyword(Keyword::Elif) => Node::Elif(ElifStatement { expr, block: None }),
        Token::Keyword(Keyword::While) => Node::While(WhileStatement { expr, block: None }),
        _ => return Err(window.mismatch("conditional")),
    };
    statement(node)
}

/// `range(to)`, `range(from, to)` and `range(from, to, step)` iterate like a range literal.
fn range_call(expr: &Expr) -> Option<RangeExpr> {
    let Expr::Call { callee, args } = expr else {
        return None;
    };
    if !matches!(callee.as_ref(), Expr::Var { name, .. } if name == "range") {
        return None;
    }
    let mut positional = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Arg::Positional(expr) => positional.push(expr.clone()),
            Arg::Keyword { .. } => return None,
        }
    }
    let (from, to, step) = match positional.as_slice() {
        [to] => (Expr::int("0"), to.clone(), Expr::int("1")),
        [from, to] => (from.clone(), to.clone(), Expr::int("1")),
        [from, to, step] => (from.clone(), to.clone(), step.clone()),
        _ => return None,
    };
    Some(RangeExpr { from, to, step })
}

/// `for x in a..b:` / `for x in expr:`
pub fn for_loop(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let (var, _) = var_at(window, 1, "for")?;
    let iter = match window.get(3) {
        Token::Range(range) => ForIter::Range(range.clone()),
        Token::Expr(expr) => match range_call(expr) {
            Some(range) => ForIter::Range(range),
            None => ForIter::Each(expr.clone()),
        },
        _ => return Err(window.mismatch("for")),
    };
    statement(Node::For(ForStatement {
        var,
        iter,
        block: None,
    }))
}

fn param(window: &Window<'_>, arg: &Arg) -> Result<Param, ParseError> {
    match arg {
        Arg::Positional(Expr::Var { name, declared }) => Ok(Param {
            name: name.clone(),
            declared: *declared,
            default: None,
        }),
        Arg::Keyword { name, value } => Ok(Param {
            name: name.clone(),
            declared: None,
            default: Some(value.clone()),
        }),
        Arg::Positional(other) => Err(window.syntax_error(format!(
            "function parameters must be names, found `{}`",
            other
        ))),
    }
}

/// `def [type] name(params):`
pub fn def(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let (name, return_type) = var_at(window, 1, "def")?;
    let args = match window.len {
        5 => Vec::new(),
        6 => match window.get(3) {
            Token::Expr(expr) => vec![Arg::Positional(expr.clone())],
            Token::KeyVal(arg) => vec![arg.clone()],
            Token::Args(args) => args.clone(),
            _ => return Err(window.mismatch("def")),
        },
        _ => return Err(window.mismatch("def")),
    };
    let params = args
        .iter()
        .map(|arg| param(window, arg))
        .collect::<Result<Vec<_>, _>>()?;
    statement(Node::Def(DefStatement {
        name,
        return_type,
        params,
        block: None,
    }))
}

/// `del target`
pub fn del(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let target = match expr_at(window, 1, "del")? {
        Expr::Var { name, declared } => Target::Var { name, declared },
        Expr::DotAccess { path } => Target::DotAccess { path },
        Expr::Index { base, index } => Target::Index {
            base: *base,
            index: *index,
        },
        other => {
            return Err(window.syntax_error(format!("cannot delete `{}`", other)));
        }
    };
    statement(Node::Del(DelStatement { target }))
}

/// An expression on its own line.
pub fn expression(window: &Window<'_>) -> Built {
    if !window.spans_line() {
        return decline();
    }
    let expr = expr_at(window, 0, "expression")?;
    statement(Node::Expression(ExprStatement { expr }))
}
