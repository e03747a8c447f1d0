//! Transpile a unit and write the result
//!
//! Output goes to `{output_dir}/{target}/{file}`, one file per unit, imported modules
//! included. Everything is rendered before the first file is written, so a unit that fails
//! leaves the output directory untouched.

use crate::backend::BackendOptions;
use crate::driver::{Transpiler, DEFAULT_INDENT_WIDTH};
use crate::error::TranspileError;
use crate::registry::BackendRegistry;
use crate::resolver::ModuleResolver;
use photon_parser::photon::ast::TranslationUnit;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct PublishSpec<'a> {
    pub unit: &'a TranslationUnit,
    pub target: &'a str,
    pub output_dir: Option<PathBuf>,
    pub options: BackendOptions,
    pub indent_width: usize,
    pub resolver: Option<&'a dyn ModuleResolver>,
}

impl<'a> PublishSpec<'a> {
    pub fn new(unit: &'a TranslationUnit, target: &'a str) -> Self {
        Self {
            unit,
            target,
            output_dir: None,
            options: BackendOptions::new(),
            indent_width: DEFAULT_INDENT_WIDTH,
            resolver: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key, value);
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ModuleResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    /// The main unit's text; modules are inlined into it.
    InMemory(String),
    /// Written files, dependencies first.
    Files(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub artifact: PublishArtifact,
}

pub fn publish(spec: PublishSpec<'_>) -> Result<PublishResult, TranspileError> {
    let registry = BackendRegistry::with_defaults();
    let target = registry.get(spec.target)?;
    let mut transpiler = Transpiler::new(target)
        .with_options(spec.options)
        .with_indent_width(spec.indent_width);
    if let Some(resolver) = spec.resolver {
        transpiler = transpiler.with_resolver(resolver);
    }
    let compiled = transpiler.transpile(spec.unit)?;

    let Some(output_dir) = spec.output_dir else {
        return Ok(PublishResult {
            artifact: PublishArtifact::InMemory(compiled.text),
        });
    };
    let dir = output_dir.join(target.name());
    create_dir(&dir)?;
    let mut written = Vec::new();
    for unit in compiled.files() {
        let path = dir.join(&unit.file_name);
        write_to_path(&path, &unit.text)?;
        info!(path = %path.display(), "wrote {}", unit.name);
        written.push(path);
    }
    Ok(PublishResult {
        artifact: PublishArtifact::Files(written),
    })
}

fn create_dir(dir: &Path) -> Result<(), TranspileError> {
    fs::create_dir_all(dir).map_err(|err| TranspileError::Io {
        path: dir.display().to_string(),
        message: err.to_string(),
    })
}

fn write_to_path(path: &Path, text: &str) -> Result<(), TranspileError> {
    fs::write(path, text).map_err(|err| TranspileError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SourceDirResolver;
    use photon_parser::photon::testing::parse;
    use tempfile::tempdir;

    #[test]
    fn publishes_to_memory_when_no_output_dir() {
        let unit = parse("x = 5\n");
        let result = publish(PublishSpec::new(&unit, "js")).expect("publish");
        assert_eq!(
            result.artifact,
            PublishArtifact::InMemory("var x = 5;\n".to_string())
        );
    }

    #[test]
    fn writes_under_target_directory() {
        let dir = tempdir().unwrap();
        let unit = parse("x = 5\n");
        let result =
            publish(PublishSpec::new(&unit, "c").with_output_dir(dir.path())).expect("publish");
        let expected = dir.path().join("c").join("main.c");
        assert_eq!(result.artifact, PublishArtifact::Files(vec![expected.clone()]));
        let contents = fs::read_to_string(expected).unwrap();
        assert!(contents.contains("int main(void) {\n    int x = 5;\n    return 0;\n}"));
    }

    #[test]
    fn writes_imported_modules_first() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("util.w"), "def twice(x):\n    return x * 2\n").unwrap();
        let resolver = SourceDirResolver::new(dir.path());
        let unit = parse("import util\nprint(twice(2))\n");
        let out = dir.path().join("Sources");
        let result = publish(
            PublishSpec::new(&unit, "js")
                .with_output_dir(&out)
                .with_resolver(&resolver),
        )
        .expect("publish");
        assert_eq!(
            result.artifact,
            PublishArtifact::Files(vec![out.join("js/util.js"), out.join("js/main.js")])
        );
    }

    #[test]
    fn failed_unit_writes_nothing() {
        let dir = tempdir().unwrap();
        let unit = parse("m = {1: 2}\n");
        let err = publish(PublishSpec::new(&unit, "c").with_output_dir(dir.path())).unwrap_err();
        assert!(matches!(err, TranspileError::UnsupportedFeature { .. }));
        assert!(!dir.path().join("c").exists());
    }

    #[test]
    fn unknown_target() {
        let unit = parse("x = 5\n");
        let err = publish(PublishSpec::new(&unit, "cobol")).unwrap_err();
        assert_eq!(err, TranspileError::TargetNotFound("cobol".to_string()));
    }
}
