//! Photon transpiler
//!
//!     This crate turns the translation units built by `photon-parser` into target language
//!     source. It has three layers:
//!
//!     - [driver]: walks the tree, keeps scopes and types, and calls the backend once per
//!       node. It owns indentation and the layout of the output file.
//!     - [backend]: the per-language formatting hooks, plus the [Target] factory that the
//!       [registry] hands out by name.
//!     - [publish]: the entry point used by the CLI. It resolves the target, transpiles, and
//!       writes one file per unit under `{output_dir}/{target}/`.
//!
//!     Two targets ship with the crate: `js`, the reference backend, and `c`, which covers the
//!     statically typed subset of the language.
//!
//!     ```rust,ignore
//!     use photon_babel::{publish, PublishSpec};
//!     use photon_parser::photon::loader::UnitLoader;
//!
//!     let unit = UnitLoader::from_string("x = 5\n").parse()?;
//!     let result = publish(PublishSpec::new(&unit, "js"))?;
//!     ```

pub mod backend;
pub mod driver;
pub mod error;
pub mod publish;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod targets;
pub mod types;

pub use backend::{Backend, BackendOptions, Target};
pub use driver::{TranspiledUnit, Transpiler};
pub use error::{TranspileError, Unsupported};
pub use publish::{publish, PublishArtifact, PublishResult, PublishSpec};
pub use registry::BackendRegistry;
pub use resolver::{ModuleResolver, NoModules, SourceDirResolver};
pub use types::{Value, ValueType};
