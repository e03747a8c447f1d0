//! Expression builders
//!
//! Precedence is not encoded in the table. Instead the unary and binary builders look at
//! the operators on either side of their window and decline when a neighbour binds tighter,
//! so the tighter operation gets reduced first on a later pass.

use super::{decline, expr_at, is_one_of, operator_at, produce, var_at, Built};
use crate::photon::ast::{Arg, Expr, ParseError, RangeExpr};
use crate::photon::parsing::engine::Window;
use crate::photon::token::{Assoc, Builtin, Kind, Operator, Token};

/// Kinds that can not directly follow a finished operand expression.
const ACCESS_FOLLOWERS: [Kind; 5] = [
    Kind::LParen,
    Kind::LBracket,
    Kind::Equal,
    Kind::AugEqual,
    Kind::In,
];

/// True when the window is about to be accessed, called or assigned. A single `.` is an
/// attribute access; `..` is a range and leaves the operand alone.
fn accessed_next(window: &Window<'_>) -> bool {
    match window.after_kind() {
        Some(Kind::Dot) => {
            let after_dot = window.tokens.get(window.start + window.len + 1);
            after_dot.map(Token::kind) != Some(Kind::Dot)
        }
        kind => is_one_of(kind, &ACCESS_FOLLOWERS),
    }
}

/// Kinds after which `(` opens an argument list rather than a group.
const CALLABLE: [Kind; 6] = [
    Kind::Var,
    Kind::DotAccess,
    Kind::Type,
    Kind::Input,
    Kind::Sizeof,
    Kind::Addr,
];

/// `= =` -> `==`
pub fn equality(_: &Window<'_>) -> Built {
    produce(Token::Operator(Operator::Eq))
}

/// `* *` -> `**`; any other operator pair is left alone.
pub fn power_operator(window: &Window<'_>) -> Built {
    let first = operator_at(window, 0, "power")?;
    let second = operator_at(window, 1, "power")?;
    if first == Operator::Mul && second == Operator::Mul {
        produce(Token::Operator(Operator::Pow))
    } else {
        decline()
    }
}

/// `< =`, `> =`, `! =` become comparisons; arithmetic operators become augmented equals.
pub fn operator_equal(window: &Window<'_>) -> Built {
    let op = operator_at(window, 0, "operator_equal")?;
    let fused = match op {
        Operator::Lt => Token::Operator(Operator::Le),
        Operator::Gt => Token::Operator(Operator::Ge),
        Operator::Bang => Token::Operator(Operator::Ne),
        op if op.is_augmentable() => Token::AugEqual(op),
        _ => return decline(),
    };
    produce(fused)
}

/// `int x` -> a variable carrying its declared type.
pub fn typed_var(window: &Window<'_>) -> Built {
    let ty = match window.get(0) {
        Token::Type(ty) => *ty,
        _ => return Err(window.mismatch("typed_var")),
    };
    let (name, _) = var_at(window, 1, "typed_var")?;
    produce(Token::Var {
        name,
        declared: Some(ty),
    })
}

pub fn dot_access(window: &Window<'_>) -> Built {
    let mut path = match window.get(0) {
        Token::Var { name, .. } => vec![name.clone()],
        Token::DotAccess(path) => path.clone(),
        _ => return Err(window.mismatch("dot_access")),
    };
    let (attr, _) = var_at(window, 2, "dot_access")?;
    path.push(attr);
    produce(Token::DotAccess(path))
}

fn callee(window: &Window<'_>, rule: &str) -> Result<Expr, ParseError> {
    match window.get(0) {
        Token::Var { name, .. } => Ok(Expr::var(name.clone())),
        Token::DotAccess(path) => Ok(Expr::DotAccess { path: path.clone() }),
        Token::IndexAccess(expr) => Ok(expr.clone()),
        _ => Err(window.mismatch(rule)),
    }
}

/// `f()`, `f(a)`, `f(a, b)`, `f(k=v)` and their method forms.
pub fn call(window: &Window<'_>) -> Built {
    if window.before_kind() == Some(Kind::Def) {
        return decline();
    }
    let callee = callee(window, "call")?;
    let args = match window.len {
        3 => Vec::new(),
        _ => match window.get(2) {
            Token::Expr(expr) => vec![Arg::Positional(expr.clone())],
            Token::Args(args) => args.clone(),
            Token::KeyVal(arg) => vec![arg.clone()],
            _ => return Err(window.mismatch("call")),
        },
    };
    produce(Token::Expr(Expr::Call {
        callee: Box::new(callee),
        args,
    }))
}

/// `int(x)`
pub fn cast(window: &Window<'_>) -> Built {
    let to = match window.get(0) {
        Token::Type(ty) => *ty,
        _ => return Err(window.mismatch("cast")),
    };
    let expr = expr_at(window, 2, "cast")?;
    produce(Token::Expr(Expr::Cast {
        to,
        expr: Box::new(expr),
    }))
}

/// `input()`, `input(prompt)`, `sizeof(x)`, `addr(x)`
pub fn builtin_call(window: &Window<'_>) -> Built {
    let builtin = match window.get(0) {
        Token::Builtin(b) => *b,
        _ => return Err(window.mismatch("builtin_call")),
    };
    let arg = match window.len {
        3 if builtin == Builtin::Input => None,
        4 => Some(Box::new(expr_at(window, 2, "builtin_call")?)),
        _ => return Err(window.mismatch("builtin_call")),
    };
    produce(Token::Expr(Expr::Builtin { builtin, arg }))
}

/// `a[i]`, `a.b[i]`, `a[i][j]`
pub fn index(window: &Window<'_>) -> Built {
    let base = callee(window, "index")?;
    let index = expr_at(window, 2, "index")?;
    produce(Token::IndexAccess(Expr::Index {
        base: Box::new(base),
        index: Box::new(index),
    }))
}

pub fn int_literal(window: &Window<'_>) -> Built {
    match window.get(0) {
        Token::Num(value) => produce(Token::Expr(Expr::int(value.clone()))),
        _ => Err(window.mismatch("int_literal")),
    }
}

pub fn float_literal(window: &Window<'_>) -> Built {
    match window.get(0) {
        Token::Float(value) => produce(Token::Expr(Expr::Float {
            value: value.clone(),
        })),
        _ => Err(window.mismatch("float_literal")),
    }
}

/// A name becomes an expression unless it is about to be accessed, called, assigned or
/// bound by a header.
pub fn variable(window: &Window<'_>) -> Built {
    if accessed_next(window)
        || is_one_of(
            window.before_kind(),
            &[Kind::Def, Kind::Class, Kind::Import, Kind::As, Kind::For],
        )
    {
        return decline();
    }
    let (name, declared) = var_at(window, 0, "variable")?;
    let expr = match (name.as_str(), declared) {
        ("true", None) => Expr::Bool { value: true },
        ("false", None) => Expr::Bool { value: false },
        ("null", None) => Expr::Null,
        _ => Expr::Var { name, declared },
    };
    produce(Token::Expr(expr))
}

pub fn dot_value(window: &Window<'_>) -> Built {
    if accessed_next(window) {
        return decline();
    }
    match window.get(0) {
        Token::DotAccess(path) => produce(Token::Expr(Expr::DotAccess { path: path.clone() })),
        _ => Err(window.mismatch("dot_value")),
    }
}

pub fn index_value(window: &Window<'_>) -> Built {
    if accessed_next(window) {
        return decline();
    }
    match window.get(0) {
        Token::IndexAccess(expr) => produce(Token::Expr(expr.clone())),
        _ => Err(window.mismatch("index_value")),
    }
}

/// `(expr)`, unless the parentheses belong to a call, cast or header.
pub fn group(window: &Window<'_>) -> Built {
    if is_one_of(window.before_kind(), &CALLABLE) {
        return decline();
    }
    let expr = expr_at(window, 1, "group")?;
    produce(Token::Expr(Expr::Group {
        expr: Box::new(expr),
    }))
}

/// `[]`, `[a]`, `[a, b, ...]`
pub fn array(window: &Window<'_>) -> Built {
    if is_one_of(
        window.before_kind(),
        &[Kind::Var, Kind::DotAccess, Kind::IndexAccess],
    ) {
        return decline();
    }
    let elements = match window.len {
        2 => Vec::new(),
        _ => match window.get(1) {
            Token::Expr(expr) => vec![expr.clone()],
            Token::Args(args) => {
                let mut elements = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        Arg::Positional(expr) => elements.push(expr.clone()),
                        Arg::Keyword { name, .. } => {
                            return Err(window.syntax_error(format!(
                                "keyword `{}` is not allowed in an array literal",
                                name
                            )))
                        }
                    }
                }
                elements
            }
            _ => return Err(window.mismatch("array")),
        },
    };
    produce(Token::Expr(Expr::Array { elements }))
}

/// `key: value` inside braces.
pub fn pair(window: &Window<'_>) -> Built {
    if !is_one_of(window.before_kind(), &[Kind::LBrace, Kind::Comma])
        || !is_one_of(window.after_kind(), &[Kind::Comma, Kind::RBrace])
    {
        return decline();
    }
    let key = expr_at(window, 0, "pair")?;
    let value = expr_at(window, 2, "pair")?;
    produce(Token::Pair(key, value))
}

pub fn pairs(window: &Window<'_>) -> Built {
    let mut pairs = match window.get(0) {
        Token::Pair(k, v) => vec![(k.clone(), v.clone())],
        Token::Pairs(pairs) => pairs.clone(),
        _ => return Err(window.mismatch("pairs")),
    };
    match window.get(2) {
        Token::Pair(k, v) => pairs.push((k.clone(), v.clone())),
        _ => return Err(window.mismatch("pairs")),
    }
    produce(Token::Pairs(pairs))
}

/// `{}`, `{k: v}`, `{k: v, ...}`
pub fn map(window: &Window<'_>) -> Built {
    let pairs = match window.len {
        2 => Vec::new(),
        _ => match window.get(1) {
            Token::Pair(k, v) => vec![(k.clone(), v.clone())],
            Token::Pairs(pairs) => pairs.clone(),
            _ => return Err(window.mismatch("map")),
        },
    };
    produce(Token::Expr(Expr::Map { pairs }))
}

/// Binding power of the operator at `at`, reading it as prefix when nothing before it ends
/// an operand.
fn operator_power(tokens: &[Token], at: usize) -> Option<u8> {
    let op = match tokens.get(at) {
        Some(Token::Operator(op)) => *op,
        _ => return None,
    };
    let prefix = at == 0 || !tokens[at - 1].ends_operand();
    if prefix || op.is_prefix_only() {
        op.unary_power()
    } else {
        op.binary_power().map(|(power, _)| power)
    }
}

/// `-x`, `not x`, `!x`, `~x`
pub fn unary(window: &Window<'_>) -> Built {
    let op = operator_at(window, 0, "unary")?;
    let power = match op.unary_power() {
        Some(power) => power,
        None => return decline(),
    };
    if window.before().is_some_and(Token::ends_operand) {
        return decline();
    }
    if let Some(Token::Operator(next)) = window.after() {
        if next.binary_power().is_some_and(|(p, _)| p > power) {
            return decline();
        }
    }
    let expr = expr_at(window, 1, "unary")?;
    produce(Token::Expr(Expr::Unary {
        op,
        expr: Box::new(expr),
    }))
}

/// `a op b`, declined while a neighbouring operator binds tighter.
pub fn binary(window: &Window<'_>) -> Built {
    let op = operator_at(window, 1, "binary")?;
    let (power, assoc) = match op.binary_power() {
        Some(binding) => binding,
        None => return decline(),
    };
    if window.start > 0 {
        if let Some(prev) = operator_power(window.tokens, window.start - 1) {
            if prev > power || (prev == power && assoc == Assoc::Left) {
                return decline();
            }
        }
    }
    if let Some(Token::Operator(next)) = window.after() {
        if let Some((next_power, _)) = next.binary_power() {
            if next_power > power || (next_power == power && assoc == Assoc::Right) {
                return decline();
            }
        }
    }
    let lhs = expr_at(window, 0, "binary")?;
    let rhs = expr_at(window, 2, "binary")?;
    produce(Token::Expr(Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }))
}

/// `from..to`; the step defaults to 1.
pub fn range(window: &Window<'_>) -> Built {
    if is_one_of(window.before_kind(), &[Kind::Operator, Kind::Dot])
        || window.after_kind() == Some(Kind::Operator)
    {
        return decline();
    }
    let from = expr_at(window, 0, "range")?;
    let to = expr_at(window, 3, "range")?;
    produce(Token::Range(RangeExpr {
        from,
        to,
        step: Expr::int("1"),
    }))
}

/// `from..to..step`
pub fn range_step(window: &Window<'_>) -> Built {
    if window.after_kind() == Some(Kind::Operator) {
        return decline();
    }
    let mut range = match window.get(0) {
        Token::Range(range) => range.clone(),
        _ => return Err(window.mismatch("range_step")),
    };
    range.step = expr_at(window, 3, "range_step")?;
    produce(Token::Range(range))
}

/// `name=value` inside an argument or parameter list.
pub fn keyval(window: &Window<'_>) -> Built {
    if !is_one_of(window.before_kind(), &[Kind::LParen, Kind::Comma])
        || !is_one_of(window.after_kind(), &[Kind::Comma, Kind::RParen])
    {
        return decline();
    }
    let (name, _) = var_at(window, 0, "keyval")?;
    let value = expr_at(window, 2, "keyval")?;
    produce(Token::KeyVal(Arg::Keyword { name, value }))
}

/// Comma-separated arguments, folded left to right.
pub fn args(window: &Window<'_>) -> Built {
    if !is_one_of(
        window.after_kind(),
        &[Kind::Comma, Kind::RParen, Kind::RBracket],
    ) {
        return decline();
    }
    let mut args = match window.get(0) {
        Token::Args(args) => args.clone(),
        first => {
            if !is_one_of(window.before_kind(), &[Kind::LParen, Kind::LBracket]) {
                return decline();
            }
            match first {
                Token::Expr(expr) => vec![Arg::Positional(expr.clone())],
                Token::KeyVal(arg) => vec![arg.clone()],
                _ => return Err(window.mismatch("args")),
            }
        }
    };
    let next = match window.get(2) {
        Token::Expr(expr) => Arg::Positional(expr.clone()),
        Token::KeyVal(arg) => arg.clone(),
        _ => return Err(window.mismatch("args")),
    };
    if matches!(next, Arg::Positional(_))
        && args.iter().any(|a| matches!(a, Arg::Keyword { .. }))
    {
        return Err(window.syntax_error("positional argument follows keyword argument"));
    }
    args.push(next);
    produce(Token::Args(args))
}
