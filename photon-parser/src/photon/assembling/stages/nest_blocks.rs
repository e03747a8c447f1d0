//! Block nesting stage
//!
//! Reduces every line of a [LineTree] and builds the statement tree from it.
//!
//! # Rules
//!
//! 1. **Blocks**: a nested container becomes the block of the line right before it. That
//!    line must reduce to a block owner, otherwise the indent is unexpected.
//! 2. **Empty bodies**: a block owner with no indented lines gets an empty block.
//! 3. **Modifiers**: `elif` / `else` receive their own block first and are then folded into
//!    the closest preceding sibling that is not a comment.

use crate::photon::assembling::attach::{attach, Attachment};
use crate::photon::ast::{Node, ParseError, SyntaxError, TranslationUnit};
use crate::photon::parsing::reduce;
use crate::photon::token::{LineContainer, LineTree, SourceContext};
use crate::photon::transforms::Runnable;

/// LineTree → TranslationUnit
pub struct NestBlocks;

impl NestBlocks {
    pub fn new() -> Self {
        NestBlocks
    }
}

impl Default for NestBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<LineTree, TranslationUnit> for NestBlocks {
    fn run(&self, input: LineTree) -> Result<TranslationUnit, ParseError> {
        let nodes = nest(input.root.children(), &input.file)?;
        Ok(TranslationUnit::new(input.file, nodes))
    }
}

fn nest(children: &[LineContainer], file: &str) -> Result<Vec<Node>, ParseError> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut items = children.iter().peekable();

    while let Some(item) = items.next() {
        let LineContainer::Line(line) = item else {
            return Err(ParseError::Internal(
                "indented block without an owning line".to_string(),
            ));
        };
        let context = line.context(file);
        let mut node = reduce(line.tokens.clone(), context)?;

        let block = match items.peek() {
            Some(LineContainer::Container { children }) => {
                items.next();
                Some(nest(children, file)?)
            }
            _ => None,
        };
        match block {
            Some(_) if !node.opens_block() => {
                return Err(SyntaxError::at(context, "unexpected indent").into());
            }
            Some(block) => attach_at(&mut node, Attachment::Block(block), context)?,
            None if node.opens_block() => {
                attach_at(&mut node, Attachment::Block(Vec::new()), context)?
            }
            None => {}
        }

        if node.is_modifier() {
            let opcode = node.opcode();
            let owner = nodes
                .iter_mut()
                .rev()
                .find(|candidate| !matches!(candidate, Node::Comment(_)));
            match owner {
                Some(owner) => attach_at(owner, Attachment::Modifier(node), context)?,
                None => {
                    return Err(SyntaxError::at(
                        context,
                        format!("`{}` without a preceding `if`", opcode),
                    )
                    .into())
                }
            }
        } else {
            tracing::trace!(line = line.number, opcode = node.opcode(), "assembled");
            nodes.push(node);
        }
    }

    Ok(nodes)
}

fn attach_at(
    owner: &mut Node,
    attachment: Attachment,
    context: SourceContext<'_>,
) -> Result<(), ParseError> {
    attach(owner, attachment).map_err(|err| SyntaxError::at(context, err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::ast::{Expr, IfStatement};
    use crate::photon::token::SourceFile;
    use crate::photon::transforms::stages::{GroupLines, SplitLines};
    use crate::photon::transforms::Transform;

    fn assemble(source: &str) -> Result<TranslationUnit, ParseError> {
        Transform::from_fn(Ok)
            .then(SplitLines::new())
            .then(GroupLines::new())
            .then(NestBlocks::new())
            .run(SourceFile::new("test.w", source))
    }

    fn message(err: ParseError) -> String {
        err.as_syntax().map(|e| e.message.clone()).unwrap_or_default()
    }

    #[test]
    fn test_block_children_in_source_order() {
        let unit = assemble("while x:\n    a = 1\n    b = 2\n    c = 3\n").unwrap();
        assert_eq!(unit.nodes.len(), 1);
        let block = unit.nodes[0].block().unwrap();
        let opcodes: Vec<&str> = block.iter().map(|n| n.opcode()).collect();
        assert_eq!(opcodes, vec!["assign", "assign", "assign"]);
    }

    #[test]
    fn test_if_else_chain() {
        let unit = assemble("if x > 0:\n    return x\nelse:\n    return 0\n").unwrap();
        assert_eq!(unit.nodes.len(), 1);
        let Node::If(IfStatement {
            block, else_block, ..
        }) = &unit.nodes[0]
        else {
            panic!("expected an if statement");
        };
        assert_eq!(block.as_ref().map(|b| b.len()), Some(1));
        assert_eq!(else_block.as_ref().map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_elif_skips_comments() {
        let unit = assemble("if a:\n    x = 1\n# other\nelif b:\n    x = 2\n").unwrap();
        assert_eq!(unit.nodes.len(), 2);
        let Node::If(chain) = &unit.nodes[0] else {
            panic!("expected an if statement");
        };
        assert_eq!(chain.elifs.len(), 1);
        assert_eq!(chain.elifs[0].expr, Expr::var("b"));
        assert_eq!(unit.nodes[1].opcode(), "comment");
    }

    #[test]
    fn test_empty_body_gets_empty_block() {
        let unit = assemble("def f():\nx = 1\n").unwrap();
        assert_eq!(unit.nodes.len(), 2);
        assert_eq!(unit.nodes[0].block(), Some(&[][..]));
    }

    #[test]
    fn test_nested_blocks() {
        let unit = assemble("for i in 0..3:\n    if i:\n        break\n    x = i\n").unwrap();
        let body = unit.nodes[0].block().unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].block().map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_indent_after_plain_statement() {
        let err = assemble("x = 1\n    y = 2\n").unwrap_err();
        assert_eq!(message(err), "unexpected indent");
    }

    #[test]
    fn test_double_else_is_a_syntax_error() {
        let err = assemble("if x:\n    a = 1\nelse:\n    a = 2\nelse:\n    a = 3\n").unwrap_err();
        let syntax = err.as_syntax().unwrap();
        assert_eq!(syntax.line_number, 5);
        assert!(syntax.message.contains("else"));
    }

    #[test]
    fn test_else_without_if() {
        let err = assemble("else:\n    x = 1\n").unwrap_err();
        assert!(message(err).contains("without a preceding `if`"));
    }
}
