//! Fluent assertions over translation units

use crate::photon::ast::{Expr, ForIter, Node, Target, TranslationUnit};

pub fn assert_unit(unit: &TranslationUnit) -> UnitAssertion<'_> {
    UnitAssertion { unit }
}

pub struct UnitAssertion<'a> {
    unit: &'a TranslationUnit,
}

impl<'a> UnitAssertion<'a> {
    pub fn node_count(self, expected: usize) -> Self {
        let actual = self.unit.nodes.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} top-level nodes, found {}: [{}]",
            self.unit.file,
            expected,
            actual,
            summarize(&self.unit.nodes)
        );
        self
    }

    pub fn opcodes(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.unit.nodes.iter().map(|n| n.opcode()).collect();
        assert_eq!(actual, expected, "{}: top-level opcodes", self.unit.file);
        self
    }

    pub fn node<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = self.unit.nodes.get(index).unwrap_or_else(|| {
            panic!(
                "{}: no node at index {}, unit has {}",
                self.unit.file,
                index,
                self.unit.nodes.len()
            )
        });
        check(NodeAssertion {
            node,
            context: format!("node[{}]", index),
        });
        self
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn opcode(self, expected: &str) -> Self {
        assert_eq!(
            self.node.opcode(),
            expected,
            "{}: Expected opcode '{}', found '{}'",
            self.context,
            expected,
            self.node.opcode()
        );
        self
    }

    /// Source rendering of the node's main expression.
    pub fn expr(self, expected: &str) -> Self {
        let actual = main_expr(self.node).map(|e| e.to_string());
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "{}: Expected expression '{}' on {}",
            self.context,
            expected,
            self.node.opcode()
        );
        self
    }

    pub fn target(self, expected: &str) -> Self {
        let actual = match self.node {
            Node::Assign(n) => Some(render_target(&n.target)),
            Node::AugAssign(n) => Some(render_target(&n.target)),
            Node::Del(n) => Some(render_target(&n.target)),
            Node::Declare(n) => Some(n.name.clone()),
            Node::For(n) => Some(n.var.clone()),
            Node::Def(n) => Some(n.name.clone()),
            Node::Class(n) => Some(n.name.clone()),
            _ => None,
        };
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "{}: Expected target '{}' on {}",
            self.context,
            expected,
            self.node.opcode()
        );
        self
    }

    pub fn block_len(self, expected: usize) -> Self {
        let block = self.block();
        assert_eq!(
            block.len(),
            expected,
            "{}: Expected block of {} nodes, found [{}]",
            self.context,
            expected,
            summarize(block)
        );
        self
    }

    pub fn child<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = self.block().get(index).unwrap_or_else(|| {
            panic!("{}: no block child at index {}", self.context, index)
        });
        check(NodeAssertion {
            node,
            context: format!("{}.block[{}]", self.context, index),
        });
        self
    }

    pub fn elif_count(self, expected: usize) -> Self {
        let Node::If(chain) = self.node else {
            panic!("{}: Expected ifStatement, found {}", self.context, self.node.opcode());
        };
        assert_eq!(
            chain.elifs.len(),
            expected,
            "{}: Expected {} elif clauses",
            self.context,
            expected
        );
        self
    }

    pub fn elif_expr(self, index: usize, expected: &str) -> Self {
        let Node::If(chain) = self.node else {
            panic!("{}: Expected ifStatement, found {}", self.context, self.node.opcode());
        };
        let actual = chain.elifs.get(index).map(|e| e.expr.to_string());
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "{}: elif[{}] condition",
            self.context,
            index
        );
        self
    }

    pub fn else_len(self, expected: usize) -> Self {
        let Node::If(chain) = self.node else {
            panic!("{}: Expected ifStatement, found {}", self.context, self.node.opcode());
        };
        let actual = chain.else_block.as_ref().map(|b| b.len());
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected else block of {} nodes",
            self.context,
            expected
        );
        self
    }

    pub fn no_else(self) -> Self {
        if let Node::If(chain) = self.node {
            assert!(
                chain.else_block.is_none(),
                "{}: Expected no else block",
                self.context
            );
        }
        self
    }

    /// Range bounds of a `for` loop, rendered as source.
    pub fn range(self, from: &str, to: &str, step: &str) -> Self {
        let Node::For(stmt) = self.node else {
            panic!("{}: Expected forStatement, found {}", self.context, self.node.opcode());
        };
        let ForIter::Range(range) = &stmt.iter else {
            panic!("{}: Expected a range loop", self.context);
        };
        assert_eq!(
            (
                range.from.to_string(),
                range.to.to_string(),
                range.step.to_string()
            ),
            (from.to_string(), to.to_string(), step.to_string()),
            "{}: range bounds",
            self.context
        );
        self
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    fn block(&self) -> &'a [Node] {
        self.node.block().unwrap_or_else(|| {
            panic!(
                "{}: {} has no block attached",
                self.context,
                self.node.opcode()
            )
        })
    }
}

fn main_expr(node: &Node) -> Option<&Expr> {
    match node {
        Node::Assign(n) => Some(&n.expr),
        Node::AugAssign(n) => Some(&n.expr),
        Node::Expression(n) => Some(&n.expr),
        Node::If(n) => Some(&n.expr),
        Node::Elif(n) => Some(&n.expr),
        Node::While(n) => Some(&n.expr),
        Node::For(n) => match &n.iter {
            ForIter::Each(expr) => Some(expr),
            ForIter::Range(_) => None,
        },
        Node::Return(n) => n.expr.as_ref(),
        _ => None,
    }
}

fn render_target(target: &Target) -> String {
    target.to_expr().to_string()
}

fn summarize(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|n| n.opcode())
        .collect::<Vec<_>>()
        .join(", ")
}
