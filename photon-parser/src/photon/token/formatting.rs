//! Phrase rendering
//!
//! Converts a (partially reduced) token list back into readable text. Diagnostics use it to
//! show how far the reducer got on a line it could not fold into a statement.

use super::core::Token;

/// Trait for converting a token to its phrase representation
pub trait ToPhrase {
    fn to_phrase(&self) -> String;
}

impl ToPhrase for Token {
    fn to_phrase(&self) -> String {
        match self {
            Token::Indent(_) => String::new(),
            Token::Keyword(k) => k.as_str().to_string(),
            Token::Operator(op) => op.as_str().to_string(),
            Token::AugEqual(op) => format!("{}=", op.as_str()),
            Token::Type(ty) => ty.as_str().to_string(),
            Token::Symbol(s) => s.as_char().to_string(),
            Token::Builtin(b) => b.as_str().to_string(),
            Token::Num(text) | Token::Float(text) | Token::Text(text) => text.clone(),
            Token::Var { name, declared } => match declared {
                Some(ty) => format!("{} {}", ty.as_str(), name),
                None => name.clone(),
            },
            Token::Expr(expr) | Token::IndexAccess(expr) => expr.to_string(),
            Token::DotAccess(path) => path.join("."),
            Token::Args(args) => args
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            Token::KeyVal(arg) => arg.to_string(),
            Token::Pair(k, v) => format!("{}: {}", k, v),
            Token::Pairs(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
            Token::Range(range) => range.to_string(),
            Token::Statement(node) => node.opcode().to_string(),
        }
    }
}

/// Render a token list as a space-separated phrase, skipping the indent marker.
pub fn phrase(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !matches!(t, Token::Indent(_)))
        .map(|t| t.to_phrase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::ast::Expr;
    use crate::photon::token::Symbol;

    #[test]
    fn test_phrase_of_partial_reduction() {
        let tokens = vec![
            Token::Indent(0),
            Token::var("x"),
            Token::Symbol(Symbol::Equal),
            Token::Symbol(Symbol::LParen),
            Token::Expr(Expr::int("5")),
        ];
        assert_eq!(phrase(&tokens), "x = ( 5");
    }
}
