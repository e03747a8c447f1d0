//! # photon-parser
//!
//! The front end of the photon transpiler: source text in, [TranslationUnit] out.
//!
//! Pipeline
//!
//!     Every line is lexed on its own ([lexing](photon::lexing)), then folded into one
//!     statement node by the pattern-table reducer ([parsing](photon::parsing)). Lines are
//!     grouped by indentation ([token::to_line_container](photon::token::to_line_container))
//!     and the statements are nested into blocks and conditional chains
//!     ([assembling](photon::assembling)). The stages are chained in
//!     [transforms](photon::transforms) and driven by the [UnitLoader](photon::loader::UnitLoader).
//!
//!     Failures at any step surface as a single `SyntaxError` that names the file, the line
//!     number, the raw line and the phrase the reducer was stuck on.
//!
//! For test helpers, see the [testing module](photon::testing).
//!
//! [TranslationUnit]: photon::ast::TranslationUnit

pub mod photon;
