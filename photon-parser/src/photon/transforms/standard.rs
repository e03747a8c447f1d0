//! Standard transform definitions
//!
//! Pre-built pipelines, held in `once_cell::sync::Lazy` statics.

use crate::photon::assembling::NestBlocks;
use crate::photon::ast::TranslationUnit;
use crate::photon::token::{LineStream, LineTree, SourceFile};
use crate::photon::transforms::stages::{GroupLines, SplitLines};
use crate::photon::transforms::Transform;
use once_cell::sync::Lazy;

/// SourceFile → LineStream: numbered, tokenized, non-blank lines.
pub static LINES: Lazy<Transform<SourceFile, LineStream>> =
    Lazy::new(|| Transform::from_fn(Ok).then(SplitLines::new()));

/// SourceFile → LineTree: lines grouped by indentation.
pub static LINE_TREE: Lazy<Transform<SourceFile, LineTree>> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&LINES).then(GroupLines::new()));

/// SourceFile → TranslationUnit: the full parser front end.
///
/// ```rust
/// use photon_parser::photon::token::SourceFile;
/// use photon_parser::photon::transforms::standard::STRING_TO_UNIT;
///
/// let unit = STRING_TO_UNIT
///     .run(SourceFile::new("main.w", "x = 5\n"))
///     .unwrap();
/// assert_eq!(unit.nodes[0].opcode(), "assign");
/// ```
pub static STRING_TO_UNIT: Lazy<Transform<SourceFile, TranslationUnit>> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&LINE_TREE).then(NestBlocks::new()));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_tree_pipeline() {
        let tree = LINE_TREE
            .run(SourceFile::new("main.w", "if x:\n    y = 1\n"))
            .unwrap();
        assert_eq!(tree.file, "main.w");
        assert_eq!(tree.root.line_count(), 2);
    }

    #[test]
    fn test_string_to_unit_pipeline() {
        let unit = STRING_TO_UNIT
            .run(SourceFile::new("src/main.w", "x = 5\nprint(x)\n"))
            .unwrap();
        assert_eq!(unit.name(), "main");
        assert_eq!(unit.nodes.len(), 2);
    }
}
