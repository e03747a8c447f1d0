//! Lexical scopes
//!
//! A stack of name → type maps. Lookups see every enclosing scope; a name is recorded in
//! the innermost scope the first time it is assigned, and later assignments only refine a
//! type that was still unknown.

use std::collections::HashMap;

use crate::types::ValueType;

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: ValueType,
    pub element: Option<ValueType>,
}

impl Binding {
    pub fn new(ty: ValueType, element: Option<ValueType>) -> Self {
        Binding { ty, element }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Unit,
    Block,
    Class(String),
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    names: HashMap<String, Binding>,
}

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope {
                kind: ScopeKind::Unit,
                names: HashMap::new(),
            }],
        }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            names: HashMap::new(),
        });
    }

    /// Leave the innermost scope. The unit scope is never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|s| s.names.get(name))
    }

    pub fn declare(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(name.into(), binding);
        }
    }

    /// Refine the nearest binding of `name` when its type was not known yet.
    pub fn refine(&mut self, name: &str, binding: Binding) {
        let found = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|s| s.names.get_mut(name));
        if let Some(existing) = found {
            if !existing.ty.is_known() {
                existing.ty = binding.ty;
            }
            if existing.element.is_none() {
                existing.element = binding.element;
            }
        }
    }

    /// The innermost enclosing class, if any.
    pub fn current_class(&self) -> Option<&str> {
        self.scopes.iter().rev().find_map(|s| match &s.kind {
            ScopeKind::Class(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Binding {
        Binding::new(ValueType::Int, None)
    }

    #[test]
    fn test_inner_scopes_see_outer_names() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", int());
        scopes.push(ScopeKind::Block);
        assert_eq!(scopes.lookup("x"), Some(&int()));
        scopes.declare("y", int());
        scopes.pop();
        assert_eq!(scopes.lookup("y"), None);
    }

    #[test]
    fn test_refine_only_fills_unknown_types() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", Binding::new(ValueType::Unknown, None));
        scopes.declare("y", int());
        scopes.push(ScopeKind::Block);
        scopes.refine("x", Binding::new(ValueType::Str, None));
        scopes.refine("y", Binding::new(ValueType::Str, None));
        assert_eq!(scopes.lookup("x").map(|b| &b.ty), Some(&ValueType::Str));
        assert_eq!(scopes.lookup("y").map(|b| &b.ty), Some(&ValueType::Int));
    }

    #[test]
    fn test_unit_scope_is_never_popped() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
        scopes.declare("x", int());
        assert!(scopes.lookup("x").is_some());
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_class_is_seen_from_method_bodies() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.current_class(), None);
        scopes.push(ScopeKind::Class("Point".to_string()));
        assert_eq!(scopes.current_class(), Some("Point"));
        scopes.push(ScopeKind::Block);
        assert_eq!(scopes.current_class(), Some("Point"));
        scopes.pop();
        scopes.pop();
        assert_eq!(scopes.current_class(), None);
    }
}
