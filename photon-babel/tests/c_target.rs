//! End-to-end output of the C target, and the constructs it rejects.

use photon_babel::targets::CTarget;
use photon_babel::{TranspileError, Transpiler};
use photon_parser::photon::testing::parse;
use rstest::rstest;

fn c(source: &str) -> Result<String, TranspileError> {
    Transpiler::new(&CTarget)
        .transpile(&parse(source))
        .map(|unit| unit.text)
}

#[test]
fn test_main_program() {
    assert_eq!(
        c("x = 5\nprint(x)\n").unwrap(),
        "#include <stdio.h>\n#include <stdbool.h>\n\nint main(void) {\n    int x = 5;\n    printf(\"%d\\n\", x);\n    return 0;\n}\n"
    );
}

#[test]
fn test_float_list_with_negative_index() {
    let out = c("a = [1.5, 2.5]\nprint(a[-1])\n").unwrap();
    assert!(out.contains("#include <stdlib.h>"));
    assert!(out.contains("#ifndef PHOTON_LIST_FLOAT"));
    assert!(out.contains("    list_float* a = list_float_from((double[]){1.5, 2.5}, 2);"));
    assert!(out.contains("    printf(\"%g\\n\", list_float_get(a, -1));"));
}

#[test]
fn test_range_loop_declares_variable_first() {
    let out = c("for i in 0..3:\n    print(i)\n").unwrap();
    assert!(
        out.contains("    int i;\n    for (i = 0; i < 3; i += 1) {\n        printf(\"%d\\n\", i);\n    } i -= 1;\n"),
        "{}",
        out
    );
}

#[test]
fn test_typed_function_goes_before_main() {
    let out = c("def int square(int n):\n    return n * n\nprint(square(3))\n").unwrap();
    let function = out.find("int square(int n) {").expect("function header");
    let main = out.find("int main(void) {").expect("main");
    assert!(function < main);
    assert!(out.contains("    printf(\"%d\\n\", square(3));"));
}

#[test]
fn test_power_pulls_in_math() {
    let out = c("y = 2.0 ** 2\n").unwrap();
    assert!(out.contains("#include <math.h>"));
    assert!(out.contains("    double y = pow(2.0, 2);"));
}

#[test]
fn test_system_import_is_include() {
    let out = c("import string\nx = 1\n").unwrap();
    assert!(out.contains("#include <string.h>\n\nint main(void) {"), "{}", out);
}

#[rstest]
#[case("m = {1: 2}\n", "maps", "map")]
#[case("class A:\n    x = 1\n", "classes", "classStatement")]
#[case("name = input()\n", "input", "input")]
#[case("def f(a):\n    return a\n", "untyped parameters", "defStatement")]
#[case("x = 1\ndel x\n", "del", "delete")]
#[case("n = 1\nprint(\"n = {n}\")\n", "string interpolation", "str")]
fn test_unsupported_constructs(
    #[case] source: &str,
    #[case] feature: &str,
    #[case] opcode: &str,
) {
    let err = c(source).unwrap_err();
    assert_eq!(
        err,
        TranspileError::UnsupportedFeature {
            feature: feature.to_string(),
            opcode: opcode.to_string(),
            target: "c".to_string(),
        }
    );
}

#[rstest]
#[case("x = not a == b\n", "    bool x = !(a == b);")]
#[case("x = a & b == c\n", "    bool x = (a & b) == c;")]
#[case("x = a | b < c\n", "    bool x = (a | b) < c;")]
#[case("x = - -a\n", "    int x = -(-a);")]
fn test_operators_keep_their_grouping(#[case] line: &str, #[case] expected: &str) {
    let out = c(&format!("a = 1\nb = 2\nc = 3\n{}", line)).unwrap();
    assert!(out.contains(expected), "{}", out);
}
