//! Tree Builder - Builds the hierarchical LineContainer tree from SourceLines
//!
//! This module groups a flat list of tokenized lines into nested containers by indentation
//! depth, using a recursive descent over a peekable line stream. Whether a line is allowed to
//! own the nested container that follows it is a grammar question answered later, during
//! assembly; here we only reject indentation that cannot be nested at all.

use crate::photon::ast::SyntaxError;
use crate::photon::token::{LineContainer, SourceLine, Token};
use std::iter::Peekable;

/// Build a LineContainer tree from tokenized, non-blank lines.
pub fn build_line_container(
    mut lines: Vec<SourceLine>,
    file: &str,
) -> Result<LineContainer, SyntaxError> {
    align_comments(&mut lines);
    let mut iter = lines.into_iter().peekable();
    let children = build_recursive(&mut iter, 0, file)?;
    Ok(LineContainer::Container { children })
}

/// Comment lines take the indentation of the next code line so that a comment never opens or
/// closes a block on its own.
fn align_comments(lines: &mut [SourceLine]) {
    let mut next_indent = 0;
    for line in lines.iter_mut().rev() {
        if line.is_comment() {
            if let Some(first) = line.tokens.first_mut() {
                *first = Token::Indent(next_indent);
            }
        } else {
            next_indent = line.indent();
        }
    }
}

fn build_recursive<I>(
    lines: &mut Peekable<I>,
    level: usize,
    file: &str,
) -> Result<Vec<LineContainer>, SyntaxError>
where
    I: Iterator<Item = SourceLine>,
{
    let mut children = Vec::new();

    while let Some(line) = lines.peek() {
        let indent = line.indent();
        if indent < level {
            // Belongs to an enclosing level.
            return Ok(children);
        }
        if indent == level {
            if let Some(line) = lines.next() {
                children.push(LineContainer::Line(line));
            }
            continue;
        }
        match children.last() {
            Some(LineContainer::Line(_)) => {
                let nested = build_recursive(lines, indent, file)?;
                children.push(LineContainer::Container { children: nested });
            }
            Some(LineContainer::Container { .. }) => {
                return Err(indentation_error(
                    line,
                    file,
                    "unindent does not match any outer indentation level",
                ));
            }
            None => return Err(indentation_error(line, file, "unexpected indent")),
        }
    }

    Ok(children)
}

fn indentation_error(line: &SourceLine, file: &str, message: &str) -> SyntaxError {
    SyntaxError {
        message: message.to_string(),
        file: file.to_string(),
        line_number: line.number,
        line: line.text.clone(),
        phrase: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::lexing::tokenize;

    fn lines(source: &str) -> Vec<SourceLine> {
        source
            .lines()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| SourceLine {
                number: i + 1,
                text: text.to_string(),
                tokens: tokenize(text),
            })
            .collect()
    }

    #[test]
    fn test_flat_lines_stay_flat() {
        let tree = build_line_container(lines("a = 1\nb = 2\n"), "t.w").unwrap();
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.line_count(), 2);
    }

    #[test]
    fn test_nested_block_follows_its_line() {
        let tree = build_line_container(lines("if a:\n    b = 1\n    c = 2\nd = 3\n"), "t.w").unwrap();
        let children = tree.children();
        assert_eq!(children.len(), 3);
        assert!(matches!(children[0], LineContainer::Line(_)));
        assert_eq!(children[1].children().len(), 2);
        assert!(matches!(children[2], LineContainer::Line(_)));
    }

    #[test]
    fn test_comment_adopts_next_line_indent() {
        let tree = build_line_container(lines("if a:\n# note\n    b = 1\n"), "t.w").unwrap();
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[1].children().len(), 2);
    }

    #[test]
    fn test_leading_indent_is_rejected() {
        let err = build_line_container(lines("    a = 1\n"), "t.w").unwrap_err();
        assert_eq!(err.message, "unexpected indent");
        assert_eq!(err.line_number, 1);
    }

    #[test]
    fn test_unknown_dedent_is_rejected() {
        let err = build_line_container(lines("if a:\n    b = 1\n  c = 2\n"), "t.w").unwrap_err();
        assert_eq!(
            err.message,
            "unindent does not match any outer indentation level"
        );
        assert_eq!(err.line_number, 3);
    }
}
