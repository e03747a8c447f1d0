//! Assembling module
//!
//!     Parsing reduces every line to a node on its own, so the tree it produces is flat.
//!     Assembling turns the grouped lines into the nested statement tree: a block-owning
//!     statement receives the nodes of the indented lines below it, and `elif` / `else`
//!     clauses are folded into the `if` they continue.
//!
//!     The ownership rules live in [attach]: a node gains its block exactly once, an `if`
//!     has at most one `else`, and only `elif` / `else` are modifiers. The
//!     [NestBlocks](stages::NestBlocks) stage walks the line tree and applies them,
//!     reporting any violation as a syntax error on the offending line.

pub mod attach;
pub mod stages;

pub use attach::{attach, Attachment};
pub use stages::NestBlocks;
