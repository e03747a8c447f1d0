//! Per-unit emission state.

use std::collections::{HashMap, HashSet};

use photon_parser::photon::ast::Param;

use super::render::{Line, Markers};
use super::Transpiler;
use crate::backend::{Backend, Hook, Lines};
use crate::error::{TranspileError, Unsupported};
use crate::scope::{Binding, ScopeStack};
use crate::types::ValueType;

/// What a call needs to know about a function: its parameters (without `self`) and the
/// declared or inferred return type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Signature {
    pub params: Vec<Param>,
    pub return_type: ValueType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ClassInfo {
    pub parent: Option<String>,
    pub members: HashMap<String, Binding>,
}

/// Functions and classes a unit declares. Imported modules contribute theirs.
#[derive(Debug, Clone, Default)]
pub(crate) struct Records {
    /// Keyed by `name` or `Class.method`.
    pub functions: HashMap<String, Signature>,
    pub classes: HashMap<String, ClassInfo>,
}

impl Records {
    pub fn merge(&mut self, other: Records) {
        for (name, signature) in other.functions {
            self.functions.entry(name).or_insert(signature);
        }
        for (name, class) in other.classes {
            self.classes.entry(name).or_insert(class);
        }
    }

    /// Walk `class` and its parents.
    fn lineage<'r>(&'r self, class: &'r str) -> impl Iterator<Item = &'r str> + 'r {
        let limit = self.classes.len() + 1;
        std::iter::successors(Some(class), move |c| {
            self.classes.get(*c).and_then(|info| info.parent.as_deref())
        })
        .take(limit)
    }

    pub fn member(&self, class: &str, name: &str) -> Option<&Binding> {
        self.lineage(class)
            .find_map(|c| self.classes.get(c).and_then(|info| info.members.get(name)))
    }

    pub fn method(&self, class: &str, name: &str) -> Option<&Signature> {
        self.lineage(class)
            .find_map(|c| self.functions.get(&format!("{}.{}", c, name)))
    }

    pub fn constructor(&self, class: &str) -> Option<&Signature> {
        self.method(class, "__init__")
            .or_else(|| self.method(class, "new"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BufferKind {
    OutOfMain,
    Source,
}

/// Where a function header was written, so it can be re-rendered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderSlot {
    pub buffer: BufferKind,
    pub index: usize,
    pub len: usize,
    pub depth: usize,
}

pub(crate) struct Emitter<'t> {
    pub transpiler: &'t Transpiler<'t>,
    pub backend: Box<dyn Backend>,
    pub target: String,
    pub markers: Markers,
    /// Unit names from the main unit down to this one.
    pub ancestry: Vec<String>,
    pub records: Records,
    pub scopes: ScopeStack,
    pub imports: Lines,
    pub imported: HashSet<String>,
    pub modules: Vec<super::TranspiledUnit>,
    pub out_of_main: Vec<Line>,
    pub source: Vec<Line>,
    pub buffer: BufferKind,
    pub depth: usize,
    /// Set while emitting the statements directly inside a class body.
    pub class_body: Option<String>,
    /// Return types seen in the functions being emitted, innermost last.
    pub frames: Vec<Option<ValueType>>,
    pub loop_counter: usize,
}

impl<'t> Emitter<'t> {
    pub fn new(transpiler: &'t Transpiler<'t>, ancestry: Vec<String>) -> Self {
        let backend = transpiler.target.backend(&transpiler.options);
        let markers = Markers {
            open: backend.block_open(),
            close: backend.block_close(),
        };
        Emitter {
            transpiler,
            backend,
            target: transpiler.target.name().to_string(),
            markers,
            ancestry,
            records: Records::default(),
            scopes: ScopeStack::new(),
            imports: Vec::new(),
            imported: HashSet::new(),
            modules: Vec::new(),
            out_of_main: Vec::new(),
            source: Vec::new(),
            buffer: BufferKind::Source,
            depth: 0,
            class_body: None,
            frames: Vec::new(),
            loop_counter: 0,
        }
    }

    pub fn buffer_mut(&mut self, kind: BufferKind) -> &mut Vec<Line> {
        match kind {
            BufferKind::OutOfMain => &mut self.out_of_main,
            BufferKind::Source => &mut self.source,
        }
    }

    /// Append hook output to the active buffer.
    pub fn push(&mut self, lines: Lines) -> Result<(), TranspileError> {
        let mut depth = self.depth;
        let laid_out = self.markers.layout(lines, &mut depth)?;
        self.depth = depth;
        let buffer = self.buffer;
        self.buffer_mut(buffer).extend(laid_out);
        Ok(())
    }

    /// Append lines at the current depth without looking at block markers.
    pub fn push_verbatim(&mut self, lines: Lines) {
        let depth = self.depth;
        let buffer = self.buffer;
        self.buffer_mut(buffer)
            .extend(lines.into_iter().map(|text| Line { depth, text }));
    }

    /// Like [Emitter::push], remembering where the lines went.
    pub fn push_header(&mut self, lines: Lines) -> Result<HeaderSlot, TranspileError> {
        let buffer = self.buffer;
        let slot = HeaderSlot {
            buffer,
            index: self.buffer_mut(buffer).len(),
            len: lines.len(),
            depth: self.depth,
        };
        self.push(lines)?;
        Ok(slot)
    }

    pub fn replace_header(&mut self, slot: HeaderSlot, lines: Lines) -> Result<(), TranspileError> {
        let mut depth = slot.depth;
        let laid_out = self.markers.layout(lines, &mut depth)?;
        self.buffer_mut(slot.buffer)
            .splice(slot.index..slot.index + slot.len, laid_out);
        Ok(())
    }

    /// Turn a backend rejection into an error naming the opcode and the target.
    pub fn check<T>(&self, result: Hook<T>, opcode: &str) -> Result<T, TranspileError> {
        result.map_err(|Unsupported { feature }| TranspileError::UnsupportedFeature {
            feature,
            opcode: opcode.to_string(),
            target: self.target.clone(),
        })
    }

    pub fn next_counter(&mut self) -> String {
        let name = format!("__iteration{}__", self.loop_counter);
        self.loop_counter += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(parent: Option<&str>, members: &[(&str, ValueType)]) -> ClassInfo {
        ClassInfo {
            parent: parent.map(str::to_string),
            members: members
                .iter()
                .map(|(n, t)| (n.to_string(), Binding::new(t.clone(), None)))
                .collect(),
        }
    }

    #[test]
    fn test_members_are_inherited() {
        let mut records = Records::default();
        records
            .classes
            .insert("Animal".into(), class(None, &[("name", ValueType::Str)]));
        records
            .classes
            .insert("Dog".into(), class(Some("Animal"), &[("age", ValueType::Int)]));
        assert_eq!(records.member("Dog", "age").unwrap().ty, ValueType::Int);
        assert_eq!(records.member("Dog", "name").unwrap().ty, ValueType::Str);
        assert!(records.member("Animal", "age").is_none());
    }

    #[test]
    fn test_parent_cycles_terminate() {
        let mut records = Records::default();
        records.classes.insert("A".into(), class(Some("B"), &[]));
        records.classes.insert("B".into(), class(Some("A"), &[]));
        assert!(records.member("A", "missing").is_none());
    }

    #[test]
    fn test_merge_keeps_local_declarations() {
        let signature = |ty| Signature {
            params: Vec::new(),
            return_type: ty,
        };
        let mut local = Records::default();
        local.functions.insert("f".into(), signature(ValueType::Int));
        let mut imported = Records::default();
        imported.functions.insert("f".into(), signature(ValueType::Str));
        imported.functions.insert("g".into(), signature(ValueType::Float));
        local.merge(imported);
        assert_eq!(local.functions["f"].return_type, ValueType::Int);
        assert_eq!(local.functions["g"].return_type, ValueType::Float);
    }
}
