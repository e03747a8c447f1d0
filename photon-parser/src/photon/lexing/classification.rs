//! Token classification
//!
//!     Turns raw pieces into classified tokens. A word is offered to each classifier in
//!     [CLASSIFIERS] order and the first one that recognizes it wins. The order is part of the
//!     language: `>` and `<` are spelled both as operators and as symbols, and come out as
//!     operators because operators are tried first. New spellings must keep to this order.
//!
//!     Whatever no table recognizes goes through [infer], which decides between integer
//!     literal, float literal and identifier by lexical shape alone. Classification never
//!     fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::photon::token::{Builtin, Keyword, Operator, Symbol, Token, TypeName};

static INT_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static FLOAT_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").unwrap());

type Classifier = fn(&str) -> Option<Token>;

/// Classifiers in priority order.
pub const CLASSIFIERS: [(&str, Classifier); 6] = [
    ("keyword", keyword),
    ("operator", operator),
    ("type", type_name),
    ("symbol", symbol),
    ("builtin", builtin),
    ("inference", inference),
];

fn keyword(word: &str) -> Option<Token> {
    Keyword::from_spelling(word).map(Token::Keyword)
}

fn operator(word: &str) -> Option<Token> {
    Operator::from_spelling(word).map(Token::Operator)
}

fn type_name(word: &str) -> Option<Token> {
    TypeName::from_spelling(word).map(Token::Type)
}

fn symbol(word: &str) -> Option<Token> {
    Symbol::from_spelling(word).map(Token::Symbol)
}

fn builtin(word: &str) -> Option<Token> {
    Builtin::from_spelling(word).map(Token::Builtin)
}

fn inference(word: &str) -> Option<Token> {
    Some(infer(word))
}

/// Classify one word using the priority chain.
pub fn classify(word: &str) -> Token {
    classify_with(&CLASSIFIERS, word)
}

/// Classify with an explicit classifier chain; the first match wins.
pub fn classify_with(classifiers: &[(&str, Classifier)], word: &str) -> Token {
    classifiers
        .iter()
        .find_map(|(_, classify)| classify(word))
        .unwrap_or_else(|| infer(word))
}

/// Integer literal, float literal or identifier, by shape.
pub fn infer(word: &str) -> Token {
    if INT_SHAPE.is_match(word) {
        Token::Num(word.to_string())
    } else if FLOAT_SHAPE.is_match(word) {
        Token::Float(word.to_string())
    } else {
        Token::var(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("while", Token::Keyword(Keyword::While))]
    #[case("and", Token::Operator(Operator::And))]
    #[case("double", Token::Type(TypeName::Double))]
    #[case(":", Token::Symbol(Symbol::BeginBlock))]
    #[case("sizeof", Token::Builtin(Builtin::Sizeof))]
    #[case("42", Token::Num("42".to_string()))]
    #[case("4.2", Token::Float("4.2".to_string()))]
    #[case("4x", Token::var("4x"))]
    #[case("count", Token::var("count"))]
    fn test_classify(#[case] word: &str, #[case] expected: Token) {
        assert_eq!(classify(word), expected);
    }

    #[test]
    fn test_operator_shadows_symbol() {
        assert_eq!(classify(">"), Token::Operator(Operator::Gt));
        assert_eq!(classify("<"), Token::Operator(Operator::Lt));
        assert_eq!(symbol(">"), Some(Token::Symbol(Symbol::GreaterThan)));
    }

    #[test]
    fn test_chain_order_decides_collisions() {
        let symbols_first: [(&str, Classifier); 2] = [("symbol", symbol), ("operator", operator)];
        assert_eq!(
            classify_with(&symbols_first, ">"),
            Token::Symbol(Symbol::GreaterThan)
        );
    }
}
