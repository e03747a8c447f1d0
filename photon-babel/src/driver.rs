//! Transpiler driver
//!
//!     The driver walks a [TranslationUnit] in source order. Every node is dispatched to the
//!     backend hook for its opcode; expressions are evaluated bottom-up into typed values
//!     first, so hooks only ever see formatted operands. Hook output lands in one of two
//!     buffers: top-level functions and classes go out of main, everything else into the body.
//!
//!     Alongside the text the driver keeps what the backends cannot know on their own: a
//!     scope stack with the type of every assigned name, recorded function signatures (for
//!     return types and keyword arguments) and class members.
//!
//!     Imports are resolved through a [ModuleResolver]. A resolvable module is compiled as its
//!     own unit, with its own backend instance, and its output is inlined into the importer.
//!
//!     Materialization order: backend prelude and imports, out-of-main declarations, then the
//!     body wrapped in the backend's boilerplate. Indentation follows the block markers.

mod emit;
mod eval;
mod render;
mod state;

use std::collections::HashSet;

use photon_parser::photon::ast::TranslationUnit;
use tracing::debug;

use crate::backend::{BackendOptions, Target};
use crate::error::TranspileError;
use crate::resolver::{ModuleResolver, NoModules};

use render::Sections;
use state::{Emitter, Records};

pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// The rendered output of one unit and of the modules it imported.
#[derive(Debug, Clone, PartialEq)]
pub struct TranspiledUnit {
    pub name: String,
    pub file_name: String,
    pub text: String,
    pub modules: Vec<TranspiledUnit>,
}

impl TranspiledUnit {
    /// This unit and every module below it, each file once, dependencies first.
    pub fn files(&self) -> Vec<&TranspiledUnit> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        self.collect(&mut seen, &mut files);
        files
    }

    fn collect<'s>(&'s self, seen: &mut HashSet<&'s str>, files: &mut Vec<&'s TranspiledUnit>) {
        for module in &self.modules {
            module.collect(seen, files);
        }
        if seen.insert(&self.file_name) {
            files.push(self);
        }
    }
}

pub struct Transpiler<'a> {
    target: &'a dyn Target,
    options: BackendOptions,
    resolver: &'a dyn ModuleResolver,
    indent_width: usize,
}

impl<'a> Transpiler<'a> {
    pub fn new(target: &'a dyn Target) -> Self {
        Transpiler {
            target,
            options: BackendOptions::default(),
            resolver: &NoModules,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ModuleResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn target(&self) -> &dyn Target {
        self.target
    }

    pub fn transpile(&self, unit: &TranslationUnit) -> Result<TranspiledUnit, TranspileError> {
        self.compile(unit, None, &[]).map(|(compiled, _)| compiled)
    }

    fn compile(
        &self,
        unit: &TranslationUnit,
        module: Option<&str>,
        ancestry: &[String],
    ) -> Result<(TranspiledUnit, Records), TranspileError> {
        let name = module.unwrap_or_else(|| unit.name()).to_string();
        let mut chain = ancestry.to_vec();
        chain.push(name.clone());

        let mut emitter = Emitter::new(self, chain);
        for node in &unit.nodes {
            emitter.emit(node)?;
        }
        if emitter.depth != 0 {
            return Err(TranspileError::internal(format!(
                "{} block(s) left open at the end of {}",
                emitter.depth, unit.file
            )));
        }

        let (start, end) = emitter.backend.boilerplate(module.is_some());
        let mut header = emitter.backend.prelude();
        header.append(&mut emitter.imports);
        let sections = Sections {
            header,
            out_of_main: std::mem::take(&mut emitter.out_of_main),
            start,
            body: std::mem::take(&mut emitter.source),
            end,
        };
        let text = render::render(sections, emitter.markers, self.indent_width)?;
        let file_name = emitter.backend.file_name(module);
        debug!(unit = %name, target = self.target.name(), file = %file_name, "transpiled unit");

        let compiled = TranspiledUnit {
            name,
            file_name,
            text,
            modules: emitter.modules,
        };
        Ok((compiled, emitter.records))
    }
}
