//! Source lines and the line tree
//!
//!     The parser works one statement per line. [SourceLine] keeps a tokenized line together
//!     with everything diagnostics need (file, 1-based number, raw text). [LineContainer] is
//!     the hierarchical grouping of those lines by indentation: a container holds the lines of
//!     one block, and a nested container follows the line that opened it.

use super::core::{Symbol, Token};

/// Where a line came from; threaded through the reducer for error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceContext<'a> {
    pub file: &'a str,
    pub line_number: usize,
    pub line: &'a str,
}

impl<'a> SourceContext<'a> {
    pub fn new(file: &'a str, line_number: usize, line: &'a str) -> Self {
        Self {
            file,
            line_number,
            line,
        }
    }
}

/// A tokenized, non-blank source line.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
    pub tokens: Vec<Token>,
}

impl SourceLine {
    pub fn indent(&self) -> usize {
        match self.tokens.first() {
            Some(Token::Indent(n)) => *n,
            _ => 0,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.tokens.get(1), Some(t) if t.is_symbol(Symbol::Hashtag))
    }

    pub fn context<'a>(&'a self, file: &'a str) -> SourceContext<'a> {
        SourceContext::new(file, self.number, &self.text)
    }
}

/// Lines grouped by indentation.
#[derive(Debug, Clone, PartialEq)]
pub enum LineContainer {
    Line(SourceLine),
    Container { children: Vec<LineContainer> },
}

impl LineContainer {
    pub fn children(&self) -> &[LineContainer] {
        match self {
            LineContainer::Container { children } => children,
            LineContainer::Line(_) => &[],
        }
    }

    /// Number of lines in this subtree.
    pub fn line_count(&self) -> usize {
        match self {
            LineContainer::Line(_) => 1,
            LineContainer::Container { children } => children.iter().map(|c| c.line_count()).sum(),
        }
    }
}

/// A named source text entering the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The tokenized, non-blank lines of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStream {
    pub file: String,
    pub lines: Vec<SourceLine>,
}

/// The lines of one file grouped by indentation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTree {
    pub file: String,
    pub root: LineContainer,
}
