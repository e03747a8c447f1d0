//! Imports of other photon units.

use std::fs;
use std::path::Path;

use photon_babel::targets::{CTarget, JsTarget};
use photon_babel::{SourceDirResolver, TranspileError, Transpiler};
use photon_parser::photon::loader::UnitLoader;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        fs::write(dir.path().join(name), source).unwrap();
    }
    dir
}

fn load(path: &Path) -> photon_parser::photon::ast::TranslationUnit {
    UnitLoader::from_path(path).unwrap().parse().unwrap()
}

#[test]
fn test_module_output_is_inlined() {
    let dir = project(&[
        ("util.w", "def twice(x):\n    return x * 2\n"),
        ("main.w", "import util\ny = twice(3)\nprint(y)\n"),
    ]);
    let resolver = SourceDirResolver::new(dir.path());
    let compiled = Transpiler::new(&JsTarget)
        .with_resolver(&resolver)
        .transpile(&load(&dir.path().join("main.w")))
        .unwrap();

    assert_eq!(
        compiled.text,
        "function twice(x) {\n    return x * 2;\n}\n\nvar y = twice(3);\nconsole.log(y);\n"
    );
    assert_eq!(compiled.modules.len(), 1);
    assert_eq!(compiled.modules[0].file_name, "util.js");
}

#[test]
fn test_module_signatures_reach_the_importer() {
    let dir = project(&[("util.w", "def int twice(int x):\n    return x * 2\n")]);
    let resolver = SourceDirResolver::new(dir.path());
    let unit = UnitLoader::from_string("import util\ny = twice(3)\n")
        .parse()
        .unwrap();
    let compiled = Transpiler::new(&CTarget)
        .with_resolver(&resolver)
        .transpile(&unit)
        .unwrap();
    assert!(compiled.text.contains("    int y = twice(3);"), "{}", compiled.text);
    assert_eq!(compiled.modules[0].file_name, "util.c");
}

#[test]
fn test_import_cycle_is_reported() {
    let dir = project(&[
        ("main.w", "import a\nx = 1\n"),
        ("a.w", "import main\n"),
    ]);
    let resolver = SourceDirResolver::new(dir.path());
    let err = Transpiler::new(&JsTarget)
        .with_resolver(&resolver)
        .transpile(&load(&dir.path().join("main.w")))
        .unwrap_err();
    assert_eq!(
        err,
        TranspileError::ImportCycle(vec!["main".into(), "a".into(), "main".into()])
    );
}

#[test]
fn test_module_is_compiled_once() {
    let dir = project(&[("util.w", "z = 1\n")]);
    let resolver = SourceDirResolver::new(dir.path());
    let unit = UnitLoader::from_string("import util\nimport util\n")
        .parse()
        .unwrap();
    let compiled = Transpiler::new(&JsTarget)
        .with_resolver(&resolver)
        .transpile(&unit)
        .unwrap();
    assert_eq!(compiled.modules.len(), 1);
    assert_eq!(compiled.text, "var z = 1;\n");
}
