//! End-to-end output of the JavaScript target.

use photon_babel::targets::JsTarget;
use photon_babel::{BackendOptions, TranspileError, Transpiler};
use photon_parser::photon::ast::{ElseStatement, Node, TranslationUnit};
use photon_parser::photon::testing::parse;
use rstest::rstest;

fn js(source: &str) -> String {
    Transpiler::new(&JsTarget)
        .transpile(&parse(source))
        .unwrap_or_else(|err| panic!("transpile failed: {}", err))
        .text
}

#[test]
fn test_assignment_declares_with_var() {
    assert_eq!(js("x = 5\n"), "var x = 5;\n");
}

#[test]
fn test_range_loop_restores_the_variable() {
    assert_eq!(
        js("for i in 0..10:\n    print(i)\n"),
        "for (var i = 0; i < 10; i += 1) {\n    console.log(i);\n} i -= 1;\n"
    );
}

#[test]
fn test_stepped_range_counts_down() {
    let out = js("for i in 10..0..-2:\n    print(i)\n");
    assert!(out.starts_with("for (var i = 10; i > 0; i += -2) {\n"), "{}", out);
    assert!(out.ends_with("} i -= -2;\n"), "{}", out);
}

#[test]
fn test_negative_index_wraps() {
    assert_eq!(
        js("a = [1, 2, 3]\nprint(a[-1])\nprint(a[0])\n"),
        "var a = [1, 2, 3];\nconsole.log(a[a.length - 1]);\nconsole.log(a[0]);\n"
    );
}

#[test]
fn test_variable_index_wraps_at_runtime() {
    let out = js("a = [1, 2, 3]\ni = 1\nprint(a[i])\n");
    assert!(out.contains("console.log(a[i >= 0 ? i : a.length + i]);"), "{}", out);
}

#[test]
fn test_conditional_chain() {
    let source = "if x > 0:\n    print(\"pos\")\nelif x < 0:\n    print(\"neg\")\nelse:\n    print(\"zero\")\n";
    assert_eq!(
        js(source),
        "if (x > 0) {\n    console.log(\"pos\");\n} else if (x < 0) {\n    console.log(\"neg\");\n} else {\n    console.log(\"zero\");\n}\n"
    );
}

#[test]
fn test_element_loop_uses_counter() {
    assert_eq!(
        js("items = [1, 2]\nfor item in items:\n    print(item)\n"),
        "var items = [1, 2];\nfor (var __iteration0__ = 0; __iteration0__ < items.length; __iteration0__++) {\n    var item = items[__iteration0__];\n    console.log(item);\n}\n"
    );
}

#[test]
fn test_interpolation_uses_template_literal() {
    assert_eq!(
        js("name = \"Ada\"\nprint(\"Hi {name}\")\n"),
        "var name = \"Ada\";\nconsole.log(`Hi ${name}`);\n"
    );
}

#[test]
fn test_power() {
    assert_eq!(
        js("y = 2 ** 3\ny **= 2\n"),
        "var y = Math.pow(2, 3);\ny = Math.pow(y, 2);\n"
    );
}

#[test]
fn test_append_and_delete() {
    assert_eq!(
        js("xs = []\nxs.append(1)\ndel xs[0]\n"),
        "var xs = [];\nxs.push(1);\nxs.splice(0, 1);\n"
    );
}

#[test]
fn test_input_requires_prompt_sync_on_node() {
    assert_eq!(
        js("name = input(\"Name? \")\n"),
        "var prompt = require(\"prompt-sync\")();\n\nvar name = prompt(\"Name? \");\n"
    );
}

#[test]
fn test_input_on_web_uses_plain_prompt() {
    let out = Transpiler::new(&JsTarget)
        .with_options(BackendOptions::new().with("platform", "web"))
        .transpile(&parse("name = input()\n"))
        .unwrap()
        .text;
    assert_eq!(out, "var name = prompt();\n");
}

#[test]
fn test_library_imports_are_required_once() {
    assert_eq!(
        js("import math\nimport os.path as p\nimport math\nx = 1\n"),
        "const math = require(\"math\");\nconst p = require(\"os/path\");\n\nvar x = 1;\n"
    );
}

#[test]
fn test_counter_class() {
    let source = "\
class Counter:
    count = 0
    def __init__(self, start):
        self.count = start
    def bump(self, by=1):
        self.count += by
c = Counter(5)
c.bump()
print(c.count)
";
    insta::assert_snapshot!("counter_class", js(source));
}

#[test]
fn test_subclass_header() {
    let out = js("class Dog(Animal):\n    legs = 4\n");
    assert_eq!(out, "class Dog extends Animal {\n    legs = 4;\n}\n");
}

#[test]
fn test_unattached_else_is_internal_error() {
    let unit = TranslationUnit::new(
        "broken.w",
        vec![Node::Else(ElseStatement {
            block: Some(Vec::new()),
        })],
    );
    let err = Transpiler::new(&JsTarget).transpile(&unit).unwrap_err();
    assert!(matches!(err, TranspileError::Internal { .. }));
    assert!(err.to_string().starts_with("InternalError:"));
}

#[test]
fn test_addr_is_unsupported() {
    let err = Transpiler::new(&JsTarget)
        .transpile(&parse("p = addr(x)\n"))
        .unwrap_err();
    assert_eq!(
        err,
        TranspileError::UnsupportedFeature {
            feature: "taking addresses".to_string(),
            opcode: "addr".to_string(),
            target: "js".to_string(),
        }
    );
}

#[rstest]
#[case("x = not a == b\n", "var x = !(a === b);")]
#[case("x = not a + b\n", "var x = !(a + b);")]
#[case("x = a & b == c\n", "var x = (a & b) === c;")]
#[case("x = a | b < c\n", "var x = (a | b) < c;")]
#[case("x = a - b - c\n", "var x = a - b - c;")]
#[case("x = a + b * c\n", "var x = a + b * c;")]
#[case("x = (a + b) * c\n", "var x = (a + b) * c;")]
fn test_operators_keep_their_grouping(#[case] line: &str, #[case] expected: &str) {
    let out = js(&format!("a = 1\nb = 2\nc = 3\n{}", line));
    assert!(out.ends_with(&format!("{}\n", expected)), "{}", out);
}

#[rstest]
#[case("x = - -1\n", "var x = -(-1);")]
#[case("x = - -a\n", "var x = -(-a);")]
fn test_nested_prefixes_stay_apart(#[case] line: &str, #[case] expected: &str) {
    let out = js(&format!("a = 1\n{}", line));
    assert!(out.ends_with(&format!("{}\n", expected)), "{}", out);
}
