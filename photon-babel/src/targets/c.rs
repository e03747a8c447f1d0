//! C backend
//!
//!     Variables are declared with their inferred C type on first assignment. Arrays map to
//!     the list runtime in [runtime], so an array literal needs a known element type. Range
//!     loop variables are declared before the loop so the post-loop adjustment stays in scope.
//!
//!     Maps, classes, `input`, `del` and string interpolation have no C counterpart here and
//!     are rejected.

pub mod runtime;

use std::collections::BTreeSet;

use photon_parser::photon::token::Operator;

use crate::backend::{
    join_values, AssignTarget, Backend, BackendOptions, DeleteTarget, FuncHeader, Hook, Lines,
    RangeBounds, StrSegment, Target,
};
use crate::error::Unsupported;
use crate::types::{Value, ValueType};

use runtime::ListKind;

pub struct CTarget;

impl Target for CTarget {
    fn name(&self) -> &str {
        "c"
    }

    fn description(&self) -> &str {
        "C99 with an embedded list runtime"
    }

    fn backend(&self, _options: &BackendOptions) -> Box<dyn Backend> {
        Box::new(CBackend::new())
    }
}

#[derive(Debug, Default)]
pub struct CBackend {
    includes: BTreeSet<&'static str>,
    lists: BTreeSet<ListKind>,
    /// Open loops: the range variable and step to restore, `None` for element loops.
    loops: Vec<Option<(String, String)>>,
}

impl CBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&mut self, array: &Value) -> Hook<ListKind> {
        let kind = array
            .element
            .as_ref()
            .and_then(ListKind::of)
            .ok_or_else(|| Unsupported::new("arrays without a known element type"))?;
        self.includes.insert("stdlib.h");
        self.lists.insert(kind);
        Ok(kind)
    }

    fn scalar(ty: &ValueType) -> Hook<&'static str> {
        match ty {
            ValueType::Int => Ok("int"),
            ValueType::Float => Ok("double"),
            ValueType::Str => Ok("char*"),
            ValueType::Bool => Ok("bool"),
            ValueType::Map => Err(Unsupported::new("maps")),
            ValueType::Class(_) => Err(Unsupported::new("classes")),
            _ => Err(Unsupported::new("values of unknown type")),
        }
    }

    fn cast_text(value: &Value, to: &ValueType) -> Hook<String> {
        if *to == ValueType::Str || value.ty == ValueType::Str {
            return Err(Unsupported::new("string conversions"));
        }
        Ok(format!("({})({})", Self::scalar(to)?, value.text))
    }

    fn with_cast(value: &Value, cast: Option<&ValueType>) -> Hook<String> {
        match cast {
            Some(to) => Self::cast_text(value, to),
            None => Ok(value.text.clone()),
        }
    }

    fn operator(op: Operator) -> &'static str {
        match op {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Is => "==",
            Operator::Not => "!",
            other => other.as_str(),
        }
    }

    fn placeholder(value: &Value) -> Hook<&'static str> {
        match value.ty {
            ValueType::Int | ValueType::Bool => Ok("%d"),
            ValueType::Float => Ok("%g"),
            ValueType::Str => Ok("%s"),
            _ => Err(Unsupported::new("printing values of unknown type")),
        }
    }
}

impl Backend for CBackend {
    fn name(&self) -> &'static str {
        "c"
    }

    fn null_literal(&self) -> &'static str {
        "NULL"
    }

    fn self_name(&self) -> &'static str {
        "self"
    }

    fn native_type(&self, ty: &ValueType, element: Option<&ValueType>) -> Hook<String> {
        if *ty == ValueType::Array {
            return element
                .and_then(ListKind::of)
                .map(|kind| format!("{}*", kind.name()))
                .ok_or_else(|| Unsupported::new("arrays without a known element type"));
        }
        Self::scalar(ty).map(str::to_string)
    }

    fn format_str(&mut self, _quote: char, segments: &[StrSegment]) -> Hook<String> {
        let mut text = String::new();
        for segment in segments {
            match segment {
                StrSegment::Text(part) => text.push_str(&part.replace('"', "\\\"")),
                StrSegment::Value(_) => return Err(Unsupported::new("string interpolation")),
            }
        }
        Ok(format!("\"{}\"", text))
    }

    fn array(&mut self, elements: &[Value], element: Option<&ValueType>) -> Hook<String> {
        let kind = element
            .and_then(ListKind::of)
            .ok_or_else(|| Unsupported::new("arrays without a known element type"))?;
        self.includes.insert("stdlib.h");
        self.lists.insert(kind);
        if elements.is_empty() {
            return Ok(format!("{}_new()", kind.name()));
        }
        Ok(format!(
            "{}_from(({}[]){{{}}}, {})",
            kind.name(),
            kind.element(),
            join_values(elements),
            elements.len()
        ))
    }

    fn map(&mut self, _pairs: &[(Value, Value)]) -> Hook<String> {
        Err(Unsupported::new("maps"))
    }

    fn index_access(&mut self, base: &Value, index: &Value) -> Hook<String> {
        match base.ty {
            ValueType::Array => {
                let kind = self.list(base)?;
                Ok(format!("{}_get({}, {})", kind.name(), base.text, index.text))
            }
            ValueType::Map => Err(Unsupported::new("maps")),
            _ => Err(Unsupported::new("indexing values that are not arrays")),
        }
    }

    fn new_instance(&mut self, _class: &str, _args: &[Value]) -> Hook<String> {
        Err(Unsupported::new("classes"))
    }

    fn cast(&mut self, value: &Value, to: &ValueType) -> Hook<String> {
        Self::cast_text(value, to)
    }

    fn input(&mut self, _prompt: Option<&Value>) -> Hook<String> {
        Err(Unsupported::new("input"))
    }

    fn sizeof(&mut self, value: &Value) -> Hook<String> {
        Ok(match value.ty {
            ValueType::Array => format!("{}->len", value.text),
            ValueType::Str => {
                self.includes.insert("string.h");
                format!("strlen({})", value.text)
            }
            _ => format!("sizeof({})", value.text),
        })
    }

    fn addr(&mut self, value: &Value) -> Hook<String> {
        Ok(format!("&{}", value.text))
    }

    fn binary(&mut self, op: Operator, lhs: &Value, rhs: &Value) -> Hook<String> {
        if op == Operator::Add && (lhs.ty == ValueType::Str || rhs.ty == ValueType::Str) {
            return Err(Unsupported::new("string concatenation"));
        }
        Ok(format!("{} {} {}", lhs.text, Self::operator(op), rhs.text))
    }

    fn unary(&mut self, op: Operator, operand: &Value) -> Hook<String> {
        Ok(format!("{}{}", Self::operator(op), operand.text))
    }

    fn power(&mut self, base: &Value, exponent: &Value) -> Hook<Value> {
        self.includes.insert("math.h");
        let call = format!("pow({}, {})", base.text, exponent.text);
        if base.ty == ValueType::Int && exponent.ty == ValueType::Int {
            Ok(Value::new(format!("(int){}", call), ValueType::Int))
        } else {
            Ok(Value::new(call, ValueType::Float))
        }
    }

    fn var_init(&mut self, name: &str, ty: &ValueType) -> Hook<Lines> {
        Ok(vec![format!("{} {};", Self::scalar(ty)?, name)])
    }

    fn assign(
        &mut self,
        target: &AssignTarget,
        value: &Value,
        cast: Option<&ValueType>,
    ) -> Hook<Lines> {
        let expr = Self::with_cast(value, cast)?;
        if !target.declare {
            return Ok(vec![format!("{} = {};", target.text, expr)]);
        }
        let ty = self.native_type(&target.ty, target.element.as_ref())?;
        Ok(vec![format!("{} {} = {};", ty, target.text, expr)])
    }

    fn index_assign(
        &mut self,
        base: &Value,
        index: &Value,
        value: &Value,
        cast: Option<&ValueType>,
    ) -> Hook<Lines> {
        if base.ty != ValueType::Array {
            return Err(Unsupported::new("indexing values that are not arrays"));
        }
        let kind = self.list(base)?;
        let expr = Self::with_cast(value, cast)?;
        Ok(vec![format!(
            "{}_set({}, {}, {});",
            kind.name(),
            base.text,
            index.text,
            expr
        )])
    }

    fn increment(&mut self, target: &Value, op: Operator, value: &Value) -> Hook<Lines> {
        Ok(vec![format!(
            "{} {}= {};",
            target.text,
            Self::operator(op),
            value.text
        )])
    }

    fn array_increment(
        &mut self,
        base: &Value,
        index: &Value,
        op: Operator,
        value: &Value,
    ) -> Hook<Lines> {
        let kind = self.list(base)?;
        Ok(vec![format!(
            "{list}_set({b}, {i}, {list}_get({b}, {i}) {op} {v});",
            list = kind.name(),
            b = base.text,
            i = index.text,
            op = Self::operator(op),
            v = value.text
        )])
    }

    fn array_append(&mut self, array: &Value, value: &Value) -> Hook<Lines> {
        let kind = self.list(array)?;
        Ok(vec![format!(
            "{}_append({}, {});",
            kind.name(),
            array.text,
            value.text
        )])
    }

    fn print(&mut self, args: &[Value]) -> Hook<Lines> {
        let placeholders = args
            .iter()
            .map(Self::placeholder)
            .collect::<Hook<Vec<_>>>()?;
        let format = format!("\"{}\\n\"", placeholders.join(" "));
        if args.is_empty() {
            return Ok(vec![format!("printf({});", format)]);
        }
        Ok(vec![format!("printf({}, {});", format, join_values(args))])
    }

    fn for_range(&mut self, var: &str, declare: bool, range: &RangeBounds) -> Hook<Lines> {
        let descending = range.step.as_int_literal().is_some_and(|s| s < 0);
        let comparison = if descending { ">" } else { "<" };
        let mut lines = Vec::new();
        if declare {
            lines.push(format!("{} {};", Self::scalar(&range.from.ty)?, var));
        }
        lines.push(format!(
            "for ({v} = {from}; {v} {cmp} {to}; {v} += {step}) {{",
            v = var,
            from = range.from.text,
            cmp = comparison,
            to = range.to.text,
            step = range.step.text
        ));
        self.loops
            .push(Some((var.to_string(), range.step.text.clone())));
        Ok(lines)
    }

    fn for_each(&mut self, var: &str, iterable: &Value, counter: &str) -> Hook<Lines> {
        if iterable.ty != ValueType::Array {
            return Err(Unsupported::new("iterating values that are not arrays"));
        }
        let kind = self.list(iterable)?;
        self.loops.push(None);
        Ok(vec![
            format!(
                "for (int {c} = 0; {c} < {a}->len; {c}++) {{",
                c = counter,
                a = iterable.text
            ),
            format!(
                "{} {} = {}_get({}, {});",
                kind.element(),
                var,
                kind.name(),
                iterable.text,
                counter
            ),
        ])
    }

    fn end_for(&mut self) -> Hook<Lines> {
        Ok(vec![match self.loops.pop().flatten() {
            Some((var, step)) => format!("}} {} -= {};", var, step),
            None => "}".to_string(),
        }])
    }

    fn func_open(&mut self, header: &FuncHeader) -> Hook<Lines> {
        if header.in_class {
            return Err(Unsupported::new("classes"));
        }
        let return_type = match header.return_type {
            ValueType::Unknown | ValueType::Null => "void".to_string(),
            ref ty => self.native_type(ty, None)?,
        };
        let params = header
            .params
            .iter()
            .map(|p| {
                if p.ty.is_known() {
                    Ok(format!("{} {}", Self::scalar(&p.ty)?, p.name))
                } else {
                    Err(Unsupported::new("untyped parameters"))
                }
            })
            .collect::<Hook<Vec<_>>>()?;
        Ok(vec![format!(
            "{} {}({}) {{",
            return_type,
            header.name,
            params.join(", ")
        )])
    }

    fn default_value(&mut self, _param: &str, _value: &Value) -> Hook<Lines> {
        Err(Unsupported::new("default parameter values"))
    }

    fn class_open(&mut self, _name: &str, _parent: Option<&str>) -> Hook<Lines> {
        Err(Unsupported::new("classes"))
    }

    fn class_attribute(&mut self, _name: &str, _value: &Value) -> Hook<Lines> {
        Err(Unsupported::new("classes"))
    }

    fn delete(&mut self, _target: &DeleteTarget) -> Hook<Lines> {
        Err(Unsupported::new("del"))
    }

    fn system_import(&mut self, module: &str, _alias: Option<&str>) -> Hook<String> {
        Ok(format!("#include <{}.h>", module.replace('.', "/")))
    }

    fn prelude(&self) -> Lines {
        let mut lines = vec![
            "#include <stdio.h>".to_string(),
            "#include <stdbool.h>".to_string(),
        ];
        lines.extend(self.includes.iter().map(|h| format!("#include <{}>", h)));
        for kind in &self.lists {
            lines.push(String::new());
            lines.extend(kind.source());
        }
        lines
    }

    fn boilerplate(&self, module: bool) -> (Lines, Lines) {
        if module {
            return (Vec::new(), Vec::new());
        }
        (
            vec!["int main(void) {".to_string()],
            vec!["return 0;".to_string(), "}".to_string()],
        )
    }

    fn file_name(&self, module: Option<&str>) -> String {
        match module {
            Some(module) => format!("{}.c", module),
            None => "main.c".to_string(),
        }
    }
}
