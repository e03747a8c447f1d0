//! Backend trait definition
//!
//!     A backend formats one construct at a time. The driver evaluates the tree, tracks
//!     scopes and types, and calls one hook per opcode with already-formatted operands; the
//!     hook answers with target text or rejects the construct as [Unsupported].
//!
//!     Expression hooks return a single fragment. Statement hooks return zero or more lines,
//!     unindented. The driver indents them by looking at the block markers: a line ending in
//!     [Backend::block_open] opens a level, a line starting with [Backend::block_close] closes
//!     one before it is written. `} else {` does both.
//!
//!     Backends are stateful (`&mut self`): they remember which runtime pieces and library
//!     imports the unit needs and which loops are open, and report them when the unit is
//!     materialized through [Backend::prelude] and [Backend::boilerplate].
//!
//!     A [Target] is the registry entry: it names the language and builds a fresh backend per
//!     translation unit.

use std::collections::HashMap;

use photon_parser::photon::token::Operator;

use crate::error::Unsupported;
use crate::types::{Value, ValueType};

pub type Lines = Vec<String>;
pub type Hook<T> = Result<T, Unsupported>;

/// One piece of a string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum StrSegment {
    Text(String),
    Value(Value),
}

/// Left-hand side of a plain assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub text: String,
    pub ty: ValueType,
    pub element: Option<ValueType>,
    /// First assignment in every visible scope.
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeBounds {
    pub from: Value,
    pub to: Value,
    pub step: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamHeader {
    pub name: String,
    pub ty: ValueType,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncHeader {
    pub name: String,
    pub params: Vec<ParamHeader>,
    pub return_type: ValueType,
    pub in_class: bool,
    pub constructor: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Name(Value),
    Attribute(Value),
    Element { base: Value, index: Value },
}

pub trait Backend {
    fn name(&self) -> &'static str;

    fn block_open(&self) -> &'static str {
        "{"
    }

    fn block_close(&self) -> &'static str {
        "}"
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn true_literal(&self) -> &'static str {
        "true"
    }

    fn false_literal(&self) -> &'static str {
        "false"
    }

    fn null_literal(&self) -> &'static str {
        "null"
    }

    fn self_name(&self) -> &'static str;

    /// Target spelling of a type.
    fn native_type(&self, ty: &ValueType, element: Option<&ValueType>) -> Hook<String>;

    // expressions

    fn format_str(&mut self, quote: char, segments: &[StrSegment]) -> Hook<String>;
    fn array(&mut self, elements: &[Value], element: Option<&ValueType>) -> Hook<String>;
    fn map(&mut self, pairs: &[(Value, Value)]) -> Hook<String>;
    fn dot_access(&mut self, path: &[String]) -> Hook<String> {
        let mut parts: Vec<&str> = path.iter().map(String::as_str).collect();
        if parts.first() == Some(&"self") {
            parts[0] = self.self_name();
        }
        Ok(parts.join("."))
    }
    fn index_access(&mut self, base: &Value, index: &Value) -> Hook<String>;
    fn call(&mut self, callee: &str, args: &[Value]) -> Hook<String> {
        Ok(format!("{}({})", callee, join_values(args)))
    }
    fn new_instance(&mut self, class: &str, args: &[Value]) -> Hook<String>;
    fn cast(&mut self, value: &Value, to: &ValueType) -> Hook<String>;
    fn input(&mut self, prompt: Option<&Value>) -> Hook<String>;
    fn sizeof(&mut self, value: &Value) -> Hook<String>;
    fn addr(&mut self, value: &Value) -> Hook<String>;
    /// Binding power of `op` in the emitted text; higher binds tighter.
    fn binding_power(&self, op: Operator, prefix: bool) -> u8 {
        c_binding_power(op, prefix)
    }
    fn binary(&mut self, op: Operator, lhs: &Value, rhs: &Value) -> Hook<String>;
    fn unary(&mut self, op: Operator, operand: &Value) -> Hook<String>;
    /// `base ** exponent`; integer only when both operands are.
    fn power(&mut self, base: &Value, exponent: &Value) -> Hook<Value>;

    // statements

    fn var_init(&mut self, name: &str, ty: &ValueType) -> Hook<Lines>;
    fn assign(
        &mut self,
        target: &AssignTarget,
        value: &Value,
        cast: Option<&ValueType>,
    ) -> Hook<Lines>;
    fn index_assign(
        &mut self,
        base: &Value,
        index: &Value,
        value: &Value,
        cast: Option<&ValueType>,
    ) -> Hook<Lines>;
    fn increment(&mut self, target: &Value, op: Operator, value: &Value) -> Hook<Lines>;
    fn array_increment(
        &mut self,
        base: &Value,
        index: &Value,
        op: Operator,
        value: &Value,
    ) -> Hook<Lines>;
    fn array_append(&mut self, array: &Value, value: &Value) -> Hook<Lines>;
    fn expression(&mut self, value: &Value) -> Hook<Lines> {
        Ok(vec![format!("{};", value.text)])
    }
    fn print(&mut self, args: &[Value]) -> Hook<Lines>;

    fn if_open(&mut self, condition: &Value) -> Hook<Lines> {
        Ok(vec![format!("if ({}) {{", condition.text)])
    }
    fn elif(&mut self, condition: &Value) -> Hook<Lines> {
        Ok(vec![format!("}} else if ({}) {{", condition.text)])
    }
    fn else_open(&mut self) -> Hook<Lines> {
        Ok(vec!["} else {".to_string()])
    }
    fn end_if(&mut self) -> Hook<Lines> {
        Ok(vec!["}".to_string()])
    }
    fn while_open(&mut self, condition: &Value) -> Hook<Lines> {
        Ok(vec![format!("while ({}) {{", condition.text)])
    }
    fn end_while(&mut self) -> Hook<Lines> {
        Ok(vec!["}".to_string()])
    }
    /// Counted loop. `end_for` undoes the last step so the variable keeps its final value.
    fn for_range(&mut self, var: &str, declare: bool, range: &RangeBounds) -> Hook<Lines>;
    /// Element loop driven by the internal `counter`.
    fn for_each(&mut self, var: &str, iterable: &Value, counter: &str) -> Hook<Lines>;
    fn end_for(&mut self) -> Hook<Lines>;

    fn func_open(&mut self, header: &FuncHeader) -> Hook<Lines>;
    /// Fill in a keyword parameter the caller left out.
    fn default_value(&mut self, param: &str, value: &Value) -> Hook<Lines>;
    fn end_func(&mut self) -> Hook<Lines> {
        Ok(vec!["}".to_string()])
    }
    fn class_open(&mut self, name: &str, parent: Option<&str>) -> Hook<Lines>;
    fn class_attribute(&mut self, name: &str, value: &Value) -> Hook<Lines>;
    fn end_class(&mut self) -> Hook<Lines> {
        Ok(vec!["}".to_string()])
    }
    fn return_value(&mut self, value: Option<&Value>) -> Hook<Lines> {
        Ok(vec![match value {
            Some(value) => format!("return {};", value.text),
            None => "return;".to_string(),
        }])
    }
    fn break_loop(&mut self) -> Hook<Lines> {
        Ok(vec!["break;".to_string()])
    }
    fn continue_loop(&mut self) -> Hook<Lines> {
        Ok(vec!["continue;".to_string()])
    }
    fn comment(&mut self, text: &str) -> Hook<Lines> {
        Ok(vec![format!("{} {}", self.comment_prefix(), text)
            .trim_end()
            .to_string()])
    }
    fn delete(&mut self, target: &DeleteTarget) -> Hook<Lines>;
    /// Import line for a library that is not another photon unit.
    fn system_import(&mut self, module: &str, alias: Option<&str>) -> Hook<String>;

    // materialization

    /// Lines that go before the imports, e.g. runtime support the unit turned out to need.
    fn prelude(&self) -> Lines;
    /// Lines wrapped around the body of the main unit.
    fn boilerplate(&self, module: bool) -> (Lines, Lines);
    fn file_name(&self, module: Option<&str>) -> String;
}

/// Operator precedence shared by C and JavaScript.
pub(crate) fn c_binding_power(op: Operator, prefix: bool) -> u8 {
    if prefix {
        return 14;
    }
    match op {
        Operator::Pow => 13,
        Operator::Mul | Operator::Div | Operator::Mod => 12,
        Operator::Add | Operator::Sub => 11,
        Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge => 9,
        Operator::Eq | Operator::Ne | Operator::Is => 8,
        Operator::BitAnd => 7,
        Operator::BitXor => 6,
        Operator::BitOr => 5,
        Operator::And => 4,
        Operator::Or => 3,
        Operator::Not | Operator::Bang | Operator::Tilde => 14,
    }
}

pub(crate) fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Free-form backend options (`platform`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOptions {
    values: HashMap<String, String>,
}

impl BackendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A registered target language.
pub trait Target: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn backend(&self, options: &BackendOptions) -> Box<dyn Backend>;
}
