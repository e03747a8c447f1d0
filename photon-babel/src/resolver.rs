//! Module resolution for `import` statements
//!
//! A resolver answers whether an imported name is another photon unit. `Some(unit)` makes the
//! driver compile and inline it; `None` leaves the import to the backend as a library import.

use std::path::{Path, PathBuf};

use photon_parser::photon::ast::TranslationUnit;
use photon_parser::photon::loader::UnitLoader;
use tracing::debug;

use crate::error::TranspileError;

pub trait ModuleResolver {
    fn resolve(&self, module: &str) -> Result<Option<TranslationUnit>, TranspileError>;
}

/// Every import is a library import.
pub struct NoModules;

impl ModuleResolver for NoModules {
    fn resolve(&self, _module: &str) -> Result<Option<TranslationUnit>, TranspileError> {
        Ok(None)
    }
}

/// Looks for `{dir}/{module}.w`, with dotted names mapped to subdirectories.
#[derive(Debug, Clone)]
pub struct SourceDirResolver {
    dir: PathBuf,
}

impl SourceDirResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SourceDirResolver { dir: dir.into() }
    }

    /// Resolve imports next to `file`.
    pub fn for_file(file: &Path) -> Self {
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    pub fn path_of(&self, module: &str) -> PathBuf {
        let mut path = self.dir.clone();
        path.extend(module.split('.'));
        path.set_extension("w");
        path
    }
}

impl ModuleResolver for SourceDirResolver {
    fn resolve(&self, module: &str) -> Result<Option<TranslationUnit>, TranspileError> {
        let path = self.path_of(module);
        if !path.is_file() {
            return Ok(None);
        }
        debug!(module, path = %path.display(), "resolved module");
        let unit = UnitLoader::from_path(&path)?.parse()?;
        Ok(Some(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_module_is_library_import() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = SourceDirResolver::new(dir.path());
        assert!(resolver.resolve("math").unwrap().is_none());
    }

    #[test]
    fn test_sibling_source_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("util.w"), "x = 1\n").unwrap();
        let resolver = SourceDirResolver::for_file(&dir.path().join("main.w"));
        let unit = resolver.resolve("util").unwrap().unwrap();
        assert_eq!(unit.name(), "util");
        assert_eq!(unit.nodes.len(), 1);
    }

    #[test]
    fn test_dotted_module_path() {
        let resolver = SourceDirResolver::new("src");
        assert_eq!(
            resolver.path_of("lib.strings"),
            Path::new("src").join("lib").join("strings.w")
        );
    }

    #[test]
    fn test_parse_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.w"), "x = (5\n").unwrap();
        let err = SourceDirResolver::new(dir.path())
            .resolve("bad")
            .unwrap_err();
        assert!(matches!(err, TranspileError::Parse(_)));
    }
}
