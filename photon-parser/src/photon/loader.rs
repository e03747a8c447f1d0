//! Unit loading utilities
//!
//! [UnitLoader] reads source text from a file or a string and runs the standard
//! pipelines on it. The CLI, the transpiler's module resolver and the tests all load
//! units through it.
//!
//! ```rust
//! use photon_parser::photon::loader::UnitLoader;
//!
//! let unit = UnitLoader::from_string("x = 5\n").parse().unwrap();
//! let lines = UnitLoader::from_string("x = 5\n").tokenize().unwrap();
//! ```

use std::fs;
use std::path::Path;

use crate::photon::ast::{ParseError, TranslationUnit};
use crate::photon::token::{LineStream, SourceFile};
use crate::photon::transforms::standard::{LINES, STRING_TO_UNIT};
use crate::photon::transforms::Transform;

/// File name used for units loaded from a string.
pub const DEFAULT_FILE_NAME: &str = "main.w";

pub struct UnitLoader {
    file: String,
    source: String,
}

impl UnitLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| ParseError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(UnitLoader {
            file: path.display().to_string(),
            source,
        })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        UnitLoader {
            file: DEFAULT_FILE_NAME.to_string(),
            source: source.into(),
        }
    }

    /// Name reported in diagnostics and used to derive the unit name.
    pub fn with_file_name(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Run any pipeline starting from the source file.
    pub fn with<O: 'static>(&self, transform: &Transform<SourceFile, O>) -> Result<O, ParseError> {
        transform.run(SourceFile::new(self.file.clone(), self.source.clone()))
    }

    pub fn parse(&self) -> Result<TranslationUnit, ParseError> {
        self.with(&STRING_TO_UNIT)
    }

    /// Numbered, tokenized lines without reduction.
    pub fn tokenize(&self) -> Result<LineStream, ParseError> {
        self.with(&LINES)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::token::Token;
    use std::io::Write;

    #[test]
    fn test_from_string_uses_default_name() {
        let unit = UnitLoader::from_string("x = 5\n").parse().unwrap();
        assert_eq!(unit.file, DEFAULT_FILE_NAME);
        assert_eq!(unit.nodes.len(), 1);
    }

    #[test]
    fn test_tokenize_starts_lines_with_indent() {
        let stream = UnitLoader::from_string("x = 5\n  y = 6\n")
            .tokenize()
            .unwrap();
        assert_eq!(stream.lines[0].tokens[0], Token::Indent(0));
        assert_eq!(stream.lines[1].tokens[0], Token::Indent(2));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "count = 3").unwrap();
        let loader = UnitLoader::from_path(file.path()).unwrap();
        assert_eq!(loader.source(), "count = 3\n");
        assert_eq!(loader.parse().unwrap().nodes[0].opcode(), "assign");
    }

    #[test]
    fn test_missing_file() {
        let err = UnitLoader::from_path("/nonexistent/photon/main.w").err();
        assert!(matches!(err, Some(ParseError::Io { .. })));
    }

    #[test]
    fn test_errors_name_the_file() {
        let err = UnitLoader::from_string("x = (5\n")
            .with_file_name("broken.w")
            .parse()
            .unwrap_err();
        let syntax = err.as_syntax().unwrap();
        assert_eq!(syntax.file, "broken.w");
        assert_eq!(syntax.line_number, 1);
        assert_eq!(syntax.line, "x = (5");
    }
}
