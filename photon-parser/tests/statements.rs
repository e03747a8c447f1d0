//! Integration tests for single-line statements and small blocks.

use photon_parser::photon::ast::{Expr, Node, Target};
use photon_parser::photon::loader::UnitLoader;
use photon_parser::photon::parsing::parse_line;
use photon_parser::photon::testing::{assert_unit, parse};
use photon_parser::photon::token::SourceContext;
use rstest::rstest;

fn opcode_of(line: &str) -> String {
    let context = SourceContext::new("test.w", 1, line);
    match parse_line(line, context) {
        Ok(node) => node.opcode().to_string(),
        Err(err) => panic!("failed to parse `{}`:\n{}", line, err),
    }
}

#[rstest]
#[case("x = 5", "assign")]
#[case("x += 1", "augAssign")]
#[case("int total", "varInit")]
#[case("int total = 0", "assign")]
#[case("point.x = 3", "assign")]
#[case("items[0] = 3", "assign")]
#[case("print(x)", "call")]
#[case("if x > 0:", "ifStatement")]
#[case("elif x < 0:", "elifStatement")]
#[case("else:", "elseStatement")]
#[case("while running:", "whileStatement")]
#[case("for i in 0..10:", "forStatement")]
#[case("for item in items:", "forStatement")]
#[case("def add(a, b):", "defStatement")]
#[case("def int add(int a, int b):", "defStatement")]
#[case("class Point:", "classStatement")]
#[case("class Point3(Point):", "classStatement")]
#[case("return x", "return")]
#[case("return", "return")]
#[case("break", "break")]
#[case("continue", "continue")]
#[case("import math", "import")]
#[case("import os.path as p", "import")]
#[case("del items[0]", "delete")]
#[case("# a comment", "comment")]
fn test_statement_opcodes(#[case] line: &str, #[case] expected: &str) {
    assert_eq!(opcode_of(line), expected);
}

#[test]
fn test_assignment_of_int_literal() {
    let unit = parse("x = 5\n");
    assert_unit(&unit).node_count(1).node(0, |n| {
        n.opcode("assign").target("x").expr("5");
    });
    let Node::Assign(assign) = &unit.nodes[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assign.target, Target::var("x"));
    assert_eq!(assign.expr, Expr::int("5"));
}

#[test]
fn test_if_else_blocks() {
    let unit = parse("if x > 0:\n    return x\nelse:\n    return 0\n");
    assert_unit(&unit).node_count(1).node(0, |n| {
        n.opcode("ifStatement")
            .expr("x > 0")
            .block_len(1)
            .elif_count(0)
            .else_len(1)
            .child(0, |c| {
                c.opcode("return").expr("x");
            });
    });
}

#[test]
fn test_range_loop_defaults_step() {
    let unit = parse("for i in 0..10:\n    print(i)\n");
    assert_unit(&unit).node(0, |n| {
        n.opcode("forStatement")
            .target("i")
            .range("0", "10", "1")
            .block_len(1);
    });
}

#[test]
fn test_range_loop_with_step() {
    let unit = parse("for i in 10..0..-2:\n    print(i)\n");
    assert_unit(&unit).node(0, |n| {
        n.range("10", "0", "-2");
    });
}

#[test]
fn test_range_call_desugars() {
    let unit = parse("for i in range(1, 5):\n    print(i)\n");
    assert_unit(&unit).node(0, |n| {
        n.range("1", "5", "1");
    });
}

#[test]
fn test_elif_chain() {
    let unit = parse(
        "if x == 1:\n    y = 1\nelif x == 2:\n    y = 2\nelif x == 3:\n    y = 3\nelif x == 4:\n    y = 4\n",
    );
    assert_unit(&unit).node_count(1).node(0, |n| {
        n.elif_count(3)
            .elif_expr(0, "x == 2")
            .elif_expr(1, "x == 3")
            .elif_expr(2, "x == 4")
            .no_else();
    });
}

#[test]
fn test_precedence() {
    let unit = parse("x = 1 + 2 * 3\n");
    let Node::Assign(assign) = &unit.nodes[0] else {
        panic!("expected an assignment");
    };
    let Expr::Binary { lhs, rhs, .. } = &assign.expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(**lhs, Expr::int("1"));
    assert_eq!(rhs.to_string(), "2 * 3");
}

#[test]
fn test_function_with_class() {
    let unit = parse(
        "class Counter:\n    def increment(self, by=1):\n        self.count += by\n        return self.count\n",
    );
    assert_unit(&unit).node_count(1).node(0, |n| {
        n.opcode("classStatement")
            .target("Counter")
            .block_len(1)
            .child(0, |method| {
                method
                    .opcode("defStatement")
                    .target("increment")
                    .block_len(2)
                    .child(0, |c| {
                        c.opcode("augAssign").target("self.count").expr("by");
                    });
            });
    });
}

#[test]
fn test_unbalanced_paren_reports_context() {
    let err = UnitLoader::from_string("y = 1\nx = (5\n")
        .with_file_name("broken.w")
        .parse()
        .unwrap_err();
    let syntax = err.as_syntax().expect("a syntax error");
    assert_eq!(syntax.file, "broken.w");
    assert_eq!(syntax.line_number, 2);
    assert_eq!(syntax.line, "x = (5");

    let report = err.to_string();
    assert!(report.contains("broken.w:2"));
    assert!(report.contains("x = (5"));
}

#[test]
fn test_bare_range_reports_what_was_written() {
    let err = UnitLoader::from_string("x = a..b\n").parse().unwrap_err();
    let syntax = err.as_syntax().expect("a syntax error");
    let phrase = syntax.phrase.as_deref().unwrap_or_default();
    assert!(phrase.contains("a..b"), "{}", phrase);
    assert!(!phrase.contains("..1"), "{}", phrase);
}

#[test]
fn test_unexpected_indent() {
    let err = UnitLoader::from_string("x = 1\n    y = 2\n")
        .parse()
        .unwrap_err();
    let syntax = err.as_syntax().expect("a syntax error");
    assert_eq!(syntax.message, "unexpected indent");
    assert_eq!(syntax.line_number, 2);
}
