//! Backend registry
//!
//! Targets are registered by name and looked up when a unit is transpiled.

use std::collections::HashMap;

use crate::backend::Target;
use crate::error::TranspileError;

pub struct BackendRegistry {
    targets: HashMap<String, Box<dyn Target>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        BackendRegistry {
            targets: HashMap::new(),
        }
    }

    /// Register a target, replacing any target with the same name.
    pub fn register<T: Target + 'static>(&mut self, target: T) {
        self.targets
            .insert(target.name().to_string(), Box::new(target));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Target, TranspileError> {
        self.targets
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| TranspileError::TargetNotFound(name.to_string()))
    }

    /// All target names, sorted.
    pub fn list_targets(&self) -> Vec<String> {
        let mut names: Vec<_> = self.targets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::targets::js::JsTarget);
        registry.register(crate::targets::c::CTarget);
        registry
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_js_and_c() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.list_targets(), vec!["c", "js"]);
        assert_eq!(registry.get("js").map(|t| t.name()).ok(), Some("js"));
    }

    #[test]
    fn test_unknown_target() {
        let registry = BackendRegistry::new();
        assert!(matches!(
            registry.get("cobol"),
            Err(TranspileError::TargetNotFound(name)) if name == "cobol"
        ));
    }

    #[test]
    fn test_targets_build_backends() {
        let registry = BackendRegistry::with_defaults();
        let backend = registry
            .get("js")
            .unwrap()
            .backend(&crate::backend::BackendOptions::new());
        assert_eq!(backend.name(), "js");
        assert_eq!(backend.file_name(None), "main.js");
        assert_eq!(backend.file_name(Some("util")), "util.js");
    }
}
