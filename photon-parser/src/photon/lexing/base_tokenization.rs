//! Base tokenization implementation for the photon lexer
//!
//! This module provides the raw split of a line using the logos lexer library. Every
//! separator (each single space, tab or punctuation character) comes out as its own piece, so
//! the classification stage can count indentation and reconstruct quoted regions verbatim.

use logos::Logos;

/// Raw pieces of a line, before classification.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Piece {
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string())]
    Float(String),

    #[regex(r"[A-Za-z0-9_]+", |lex| lex.slice().to_string(), priority = 3)]
    Word(String),

    #[token(" ")]
    Space,

    #[token("\t")]
    Tab,

    #[regex(r"\r?\n")]
    NewLine,

    // Any other single character
    #[regex(r".", |lex| lex.slice().chars().next(), priority = 1)]
    Punct(char),
}

impl Piece {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Piece::Space | Piece::Tab | Piece::NewLine)
    }
}

/// Split a line into pieces paired with their byte spans.
pub fn tokenize(source: &str) -> Vec<(Piece, logos::Span)> {
    let mut lexer = Piece::lexer(source);
    let mut pieces = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(piece) = result {
            pieces.push((piece, lexer.span()));
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(source: &str) -> Vec<Piece> {
        tokenize(source).into_iter().map(|(p, _)| p).collect()
    }

    #[test]
    fn test_separators_are_standalone() {
        assert_eq!(
            pieces("a  b"),
            vec![
                Piece::Word("a".to_string()),
                Piece::Space,
                Piece::Space,
                Piece::Word("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_float_wins_over_word() {
        assert_eq!(pieces("3.25"), vec![Piece::Float("3.25".to_string())]);
    }

    #[test]
    fn test_range_dots_do_not_make_a_float() {
        assert_eq!(
            pieces("0..10"),
            vec![
                Piece::Word("0".to_string()),
                Piece::Punct('.'),
                Piece::Punct('.'),
                Piece::Word("10".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pieces(""), vec![]);
    }
}
