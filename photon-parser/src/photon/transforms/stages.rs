//! Line-level pipeline stages
//!
//!     [SplitLines] turns a [SourceFile] into numbered, tokenized lines and drops blank
//!     ones. [GroupLines] nests those lines by indentation. Reduction and block attachment
//!     happen afterwards in [assembling](crate::photon::assembling).

use crate::photon::ast::ParseError;
use crate::photon::lexing::tokenize;
use crate::photon::token::{build_line_container, LineStream, LineTree, SourceFile, SourceLine};
use crate::photon::transforms::Runnable;

/// SourceFile → LineStream
pub struct SplitLines;

impl SplitLines {
    pub fn new() -> Self {
        SplitLines
    }
}

impl Default for SplitLines {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<SourceFile, LineStream> for SplitLines {
    fn run(&self, input: SourceFile) -> Result<LineStream, ParseError> {
        let lines = input
            .text
            .lines()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| SourceLine {
                number: index + 1,
                text: text.to_string(),
                tokens: tokenize(text),
            })
            .collect();
        Ok(LineStream {
            file: input.name,
            lines,
        })
    }
}

/// LineStream → LineTree
pub struct GroupLines;

impl GroupLines {
    pub fn new() -> Self {
        GroupLines
    }
}

impl Default for GroupLines {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<LineStream, LineTree> for GroupLines {
    fn run(&self, input: LineStream) -> Result<LineTree, ParseError> {
        let root = build_line_container(input.lines, &input.file)?;
        Ok(LineTree {
            file: input.file,
            root,
        })
    }
}
