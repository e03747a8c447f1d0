//! Lexer
//!
//!     This module turns one raw source line into an ordered list of classified tokens. It
//!     never fails: anything unrecognized is an identifier, and structural problems are left
//!     for the reducer to report.
//!
//! The Lexing Pipeline
//!
//!     1. Base tokenization using logos. See [base_tokenization]. Every separator is its own
//!        piece.
//!
//!     2. Indentation. The leading run of spaces and tabs is counted (one per character) and
//!        emitted as the single [Token::Indent] that opens every line.
//!
//!     3. Quoted regions. From an opening `'` or `"` up to the next unescaped quote of the
//!        same kind, pieces are concatenated verbatim into one [Token::Text], framed by the
//!        two quote symbols. A backslash escapes the following character.
//!
//!     4. Comments. A `#` outside quotes at the start of a line yields `#` plus the rest of
//!        the line as text; anywhere else it ends the line.
//!
//!     5. Classification of the remaining words. See [classification].
//!
//!     Whitespace between tokens is dropped, which also makes `obj .attr` lex the same as
//!     `obj.attr`.

pub mod base_tokenization;
pub mod classification;

use base_tokenization::Piece;

use crate::photon::token::{Symbol, Token};

pub use classification::{classify, infer};

/// Tokenize one source line.
pub fn tokenize(line: &str) -> Vec<Token> {
    let pieces = base_tokenization::tokenize(line);
    let mut iter = pieces.into_iter().peekable();

    let mut indent = 0;
    while let Some((Piece::Space | Piece::Tab, _)) = iter.peek() {
        indent += 1;
        iter.next();
    }

    let mut tokens = vec![Token::Indent(indent)];
    let mut quote: Option<(Symbol, String)> = None;
    let mut escaped = false;

    while let Some((piece, span)) = iter.next() {
        let raw = &line[span.clone()];

        if let Some((open, content)) = quote.as_mut() {
            if escaped {
                content.push_str(raw);
                escaped = false;
                continue;
            }
            match piece {
                Piece::Punct('\\') => {
                    content.push('\\');
                    escaped = true;
                }
                Piece::Punct(c) if c == open.as_char() => {
                    let close = *open;
                    if !content.is_empty() {
                        tokens.push(Token::Text(std::mem::take(content)));
                    }
                    tokens.push(Token::Symbol(close));
                    quote = None;
                }
                _ => content.push_str(raw),
            }
            continue;
        }

        match piece {
            _ if piece.is_whitespace() => {}
            Piece::Punct('#') => {
                if tokens.len() == 1 {
                    tokens.push(Token::Symbol(Symbol::Hashtag));
                    let rest = line[span.end..].trim();
                    if !rest.is_empty() {
                        tokens.push(Token::Text(rest.to_string()));
                    }
                }
                break;
            }
            Piece::Punct(c @ ('"' | '\'')) => {
                let symbol = if c == '"' {
                    Symbol::DoubleQuote
                } else {
                    Symbol::SingleQuote
                };
                tokens.push(Token::Symbol(symbol));
                quote = Some((symbol, String::new()));
            }
            _ => tokens.push(classify(raw)),
        }
    }

    // Unclosed quote: keep what was read, the reducer reports the line.
    if let Some((_, content)) = quote {
        if !content.is_empty() {
            tokens.push(Token::Text(content));
        }
    }

    tokens
}
