//! String literal builders
//!
//! The lexer hands over the verbatim content of a quoted region. Here it is split on `{expr}`
//! placeholders; each placeholder is tokenized and reduced on its own, with the same source
//! context so errors still point at the enclosing line. Empty braces `{}` stay literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{produce, Built};
use crate::photon::ast::{Expr, ParseError, StrLiteral, StrPart};
use crate::photon::parsing::engine::Window;
use crate::photon::parsing::parse_expression;
use crate::photon::token::{SourceContext, Token};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

fn quote_at(window: &Window<'_>, rule: &str) -> Result<char, ParseError> {
    match window.get(0) {
        Token::Symbol(s) if s.is_quote() => Ok(s.as_char()),
        _ => Err(window.mismatch(rule)),
    }
}

/// `"text"` / `'text'`
pub fn string(window: &Window<'_>) -> Built {
    let quote = quote_at(window, "string")?;
    let text = match window.get(1) {
        Token::Text(text) => text,
        _ => return Err(window.mismatch("string")),
    };
    let literal = split_placeholders(quote, text, window.context)?;
    produce(Token::Expr(Expr::Str(literal)))
}

/// `""` / `''`
pub fn empty_string(window: &Window<'_>) -> Built {
    let quote = quote_at(window, "empty_string")?;
    produce(Token::Expr(Expr::Str(StrLiteral::plain(quote, ""))))
}

/// Split string content into literal text and interpolated expressions.
pub fn split_placeholders(
    quote: char,
    text: &str,
    context: SourceContext<'_>,
) -> Result<StrLiteral, ParseError> {
    let mut parts = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if inner.as_str().trim().is_empty() {
            continue;
        }
        if whole.start() > last {
            parts.push(StrPart::Text(text[last..whole.start()].to_string()));
        }
        let expr = parse_expression(inner.as_str(), context).map_err(|err| match err {
            ParseError::Syntax(mut err) => {
                err.message = format!(
                    "invalid interpolation `{{{}}}`: {}",
                    inner.as_str(),
                    err.message
                );
                ParseError::Syntax(err)
            }
            other => other,
        })?;
        parts.push(StrPart::Value(expr));
        last = whole.end();
    }

    if last < text.len() {
        parts.push(StrPart::Text(text[last..].to_string()));
    }

    Ok(StrLiteral { quote, parts })
}
