//! Testing utilities
//!
//!     Tests across the workspace check parsed units through the fluent [assert_unit] API
//!     instead of matching on AST variants by hand. A test states the opcodes, block shapes
//!     and expression sources it expects, and a failure names the path to the offending
//!     node (`node[0].block[1]`).
//!
//!     ```rust,ignore
//!     use photon_parser::photon::testing::{assert_unit, parse};
//!
//!     let unit = parse("if x > 0:\n    return x\nelse:\n    return 0\n");
//!     assert_unit(&unit).node_count(1).node(0, |n| {
//!         n.opcode("ifStatement")
//!             .expr("x > 0")
//!             .block_len(1)
//!             .else_len(1)
//!             .child(0, |c| {
//!                 c.opcode("return").expr("x");
//!             });
//!     });
//!     ```
//!
//!     Expressions are compared through their source rendering, so `expr("a + b * 2")` is
//!     independent of how the tree nests the operands.

mod unit_assertions;

pub use unit_assertions::{assert_unit, NodeAssertion, UnitAssertion};

use crate::photon::ast::TranslationUnit;
use crate::photon::loader::UnitLoader;

/// Parse `source` as `test.w`, panicking with the full diagnostic on failure.
pub fn parse(source: &str) -> TranslationUnit {
    match UnitLoader::from_string(source).with_file_name("test.w").parse() {
        Ok(unit) => unit,
        Err(err) => panic!("failed to parse test source:\n{}", err),
    }
}
