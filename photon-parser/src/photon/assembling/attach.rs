//! Block and modifier attachment
//!
//! [attach] has two modes. A [Attachment::Block] fills the body slot of a block owner. A
//! [Attachment::Modifier] folds an `elif` or `else` node, whose own block is already attached,
//! into an `if`: an `elif` is appended to `elifs` in arrival order, an `else` fills the else
//! slot.

use crate::photon::ast::{AttachError, ElifClause, Node};

#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Block(Vec<Node>),
    Modifier(Node),
}

pub fn attach(owner: &mut Node, attachment: Attachment) -> Result<(), AttachError> {
    match attachment {
        Attachment::Block(block) => attach_block(owner, block),
        Attachment::Modifier(modifier) => attach_modifier(owner, modifier),
    }
}

fn attach_block(owner: &mut Node, block: Vec<Node>) -> Result<(), AttachError> {
    let opcode = owner.opcode();
    let slot = owner
        .block_slot()
        .ok_or(AttachError::NotBlockOwner(opcode))?;
    if slot.is_some() {
        return Err(AttachError::DoubleBlock(opcode));
    }
    *slot = Some(block);
    Ok(())
}

fn attach_modifier(owner: &mut Node, modifier: Node) -> Result<(), AttachError> {
    if !modifier.is_modifier() {
        return Err(AttachError::UnknownModifier(modifier.opcode()));
    }
    let owner_opcode = owner.opcode();
    let Node::If(chain) = owner else {
        return Err(AttachError::NotModifierOwner {
            modifier: modifier.opcode(),
            owner: owner_opcode,
        });
    };

    match modifier {
        Node::Elif(elif) => {
            if chain.else_block.is_some() {
                return Err(AttachError::ElifAfterElse);
            }
            chain.elifs.push(ElifClause {
                expr: elif.expr,
                block: elif.block.unwrap_or_default(),
            });
        }
        Node::Else(otherwise) => {
            if chain.else_block.is_some() {
                return Err(AttachError::DoubleElse);
            }
            chain.else_block = Some(otherwise.block.unwrap_or_default());
        }
        other => return Err(AttachError::UnknownModifier(other.opcode())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::ast::{
        ElifStatement, ElseStatement, Expr, IfStatement, ReturnStatement, WhileStatement,
    };

    fn if_node() -> Node {
        Node::If(IfStatement {
            expr: Expr::var("x"),
            block: Some(vec![Node::Break]),
            elifs: Vec::new(),
            else_block: None,
        })
    }

    fn elif(n: &str) -> Node {
        Node::Elif(ElifStatement {
            expr: Expr::int(n),
            block: Some(vec![Node::Return(ReturnStatement {
                expr: Some(Expr::int(n)),
            })]),
        })
    }

    fn otherwise() -> Node {
        Node::Else(ElseStatement {
            block: Some(vec![Node::Continue]),
        })
    }

    #[test]
    fn test_block_attaches_once() {
        let mut node = Node::While(WhileStatement {
            expr: Expr::var("running"),
            block: None,
        });
        attach(&mut node, Attachment::Block(vec![Node::Break])).unwrap();
        assert_eq!(node.block(), Some(&[Node::Break][..]));

        let err = attach(&mut node, Attachment::Block(vec![])).unwrap_err();
        assert_eq!(err, AttachError::DoubleBlock("whileStatement"));
    }

    #[test]
    fn test_block_needs_an_owner() {
        let err = attach(&mut Node::Break, Attachment::Block(vec![])).unwrap_err();
        assert_eq!(err, AttachError::NotBlockOwner("break"));
    }

    #[test]
    fn test_three_elifs_keep_arrival_order() {
        let mut node = if_node();
        for n in ["1", "2", "3"] {
            attach(&mut node, Attachment::Modifier(elif(n))).unwrap();
        }
        let Node::If(chain) = node else {
            panic!("expected an if statement");
        };
        let conditions: Vec<Expr> = chain.elifs.iter().map(|e| e.expr.clone()).collect();
        assert_eq!(conditions, vec![Expr::int("1"), Expr::int("2"), Expr::int("3")]);
    }

    #[test]
    fn test_second_else_fails() {
        let mut node = if_node();
        attach(&mut node, Attachment::Modifier(otherwise())).unwrap();
        let err = attach(&mut node, Attachment::Modifier(otherwise())).unwrap_err();
        assert_eq!(err, AttachError::DoubleElse);
    }

    #[test]
    fn test_elif_after_else_fails() {
        let mut node = if_node();
        attach(&mut node, Attachment::Modifier(otherwise())).unwrap();
        let err = attach(&mut node, Attachment::Modifier(elif("1"))).unwrap_err();
        assert_eq!(err, AttachError::ElifAfterElse);
    }

    #[test]
    fn test_modifier_needs_an_if() {
        let mut node = Node::While(WhileStatement {
            expr: Expr::var("x"),
            block: Some(vec![]),
        });
        let err = attach(&mut node, Attachment::Modifier(otherwise())).unwrap_err();
        assert_eq!(
            err,
            AttachError::NotModifierOwner {
                modifier: "elseStatement",
                owner: "whileStatement",
            }
        );
    }

    #[test]
    fn test_unknown_modifier() {
        let mut node = if_node();
        let err = attach(&mut node, Attachment::Modifier(Node::Break)).unwrap_err();
        assert_eq!(err, AttachError::UnknownModifier("break"));
    }
}
