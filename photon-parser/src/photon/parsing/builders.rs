//! Rule builders
//!
//! Builders receive the matched window and either produce the replacement token or decline.
//! Guards that decline a structurally matching window live here, next to the construction
//! code they protect. Helpers in this module extract typed payloads from window positions;
//! a payload of the wrong shape means the rule table and its builder disagree, which is an
//! internal error rather than a syntax error.

pub mod expressions;
pub mod statements;
pub mod strings;

use super::engine::Window;
use crate::photon::ast::{Expr, Node, ParseError};
use crate::photon::token::{Kind, Operator, Token, TypeName};

pub type Built = Result<Option<Token>, ParseError>;

pub(crate) fn produce(token: Token) -> Built {
    Ok(Some(token))
}

pub(crate) fn statement(node: Node) -> Built {
    Ok(Some(Token::Statement(node)))
}

pub(crate) fn decline() -> Built {
    Ok(None)
}

pub(crate) fn is_one_of(kind: Option<Kind>, kinds: &[Kind]) -> bool {
    matches!(kind, Some(k) if kinds.contains(&k))
}

pub(crate) fn expr_at(window: &Window<'_>, i: usize, rule: &str) -> Result<Expr, ParseError> {
    match window.get(i) {
        Token::Expr(expr) => Ok(expr.clone()),
        _ => Err(window.mismatch(rule)),
    }
}

pub(crate) fn var_at(
    window: &Window<'_>,
    i: usize,
    rule: &str,
) -> Result<(String, Option<TypeName>), ParseError> {
    match window.get(i) {
        Token::Var { name, declared } => Ok((name.clone(), *declared)),
        _ => Err(window.mismatch(rule)),
    }
}

pub(crate) fn operator_at(window: &Window<'_>, i: usize, rule: &str) -> Result<Operator, ParseError> {
    match window.get(i) {
        Token::Operator(op) | Token::AugEqual(op) => Ok(*op),
        _ => Err(window.mismatch(rule)),
    }
}
