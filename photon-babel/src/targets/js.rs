//! JavaScript backend
//!
//!     Everything is declared with `var`; types only matter for casts, power results and
//!     indexing. Negative indices wrap against `.length`: constant indices are folded
//!     (`a[0]`, `a[a.length - 1]`), anything else becomes `a[i >= 0 ? i : a.length + i]`.
//!     Maps index plainly.
//!
//!     `input()` uses `prompt`. On the node platform the unit pulls in `prompt-sync`, which
//!     the prelude emits once. It is bound with `var` so that an inlined module may repeat it.

use std::collections::BTreeSet;

use photon_parser::photon::token::Operator;

use crate::backend::{
    c_binding_power, join_values, AssignTarget, Backend, BackendOptions, DeleteTarget,
    FuncHeader, Hook, Lines, RangeBounds, StrSegment, Target,
};
use crate::error::Unsupported;
use crate::types::{Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Node,
    Web,
}

pub struct JsTarget;

impl Target for JsTarget {
    fn name(&self) -> &str {
        "js"
    }

    fn description(&self) -> &str {
        "JavaScript (node or web)"
    }

    fn backend(&self, options: &BackendOptions) -> Box<dyn Backend> {
        let platform = match options.get("platform") {
            Some("web") => Platform::Web,
            _ => Platform::Node,
        };
        Box::new(JsBackend::new(platform))
    }
}

/// Open loops, innermost last.
#[derive(Debug)]
enum Loop {
    Range { var: String, step: String },
    Each,
}

#[derive(Debug)]
pub struct JsBackend {
    platform: Platform,
    requires: BTreeSet<String>,
    loops: Vec<Loop>,
}

impl JsBackend {
    pub fn new(platform: Platform) -> Self {
        JsBackend {
            platform,
            requires: BTreeSet::new(),
            loops: Vec::new(),
        }
    }

    /// Index expression with negative wraparound for arrays and strings.
    fn wrapped_index(&self, base: &Value, index: &Value) -> String {
        if matches!(base.ty, ValueType::Map | ValueType::Class(_)) {
            return index.text.clone();
        }
        match index.as_int_literal() {
            Some(i) if i >= 0 => index.text.clone(),
            Some(i) => format!("{}.length - {}", base.text, -i),
            None => format!(
                "{i} >= 0 ? {i} : {b}.length + {i}",
                i = index.clone().bound(c_binding_power(Operator::Add, false), true).text,
                b = base.text
            ),
        }
    }

    fn operator(op: Operator) -> &'static str {
        match op {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Eq | Operator::Is => "===",
            Operator::Ne => "!==",
            Operator::Not | Operator::Bang => "!",
            other => other.as_str(),
        }
    }

    fn cast_text(&self, value: &Value, to: &ValueType) -> Hook<String> {
        let function = match to {
            ValueType::Int => "parseInt",
            ValueType::Float => "parseFloat",
            ValueType::Str => "String",
            ValueType::Bool => "Boolean",
            other => return Err(Unsupported::new(format!("casts to {}", other))),
        };
        Ok(format!("{}({})", function, value.text))
    }

    fn with_cast(&self, value: &Value, cast: Option<&ValueType>) -> Hook<String> {
        match cast {
            Some(to) => self.cast_text(value, to),
            None => Ok(value.text.clone()),
        }
    }
}

fn escape_template(text: &str) -> String {
    text.replace('`', "\\`").replace("${", "\\${")
}

impl Backend for JsBackend {
    fn name(&self) -> &'static str {
        "js"
    }

    fn self_name(&self) -> &'static str {
        "this"
    }

    fn native_type(&self, _ty: &ValueType, _element: Option<&ValueType>) -> Hook<String> {
        Ok("var".to_string())
    }

    fn format_str(&mut self, quote: char, segments: &[StrSegment]) -> Hook<String> {
        let interpolated = segments.iter().any(|s| matches!(s, StrSegment::Value(_)));
        if !interpolated {
            let text: String = segments
                .iter()
                .map(|s| match s {
                    StrSegment::Text(text) => text.as_str(),
                    StrSegment::Value(_) => "",
                })
                .collect();
            return Ok(format!("{q}{}{q}", text, q = quote));
        }
        let mut out = String::from("`");
        for segment in segments {
            match segment {
                StrSegment::Text(text) => out.push_str(&escape_template(text)),
                StrSegment::Value(value) => {
                    out.push_str("${");
                    out.push_str(&value.text);
                    out.push('}');
                }
            }
        }
        out.push('`');
        Ok(out)
    }

    fn array(&mut self, elements: &[Value], _element: Option<&ValueType>) -> Hook<String> {
        Ok(format!("[{}]", join_values(elements)))
    }

    fn map(&mut self, pairs: &[(Value, Value)]) -> Hook<String> {
        let entries: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("[{}]: {}", k.text, v.text))
            .collect();
        Ok(format!("{{{}}}", entries.join(", ")))
    }

    fn index_access(&mut self, base: &Value, index: &Value) -> Hook<String> {
        Ok(format!("{}[{}]", base.text, self.wrapped_index(base, index)))
    }

    fn new_instance(&mut self, class: &str, args: &[Value]) -> Hook<String> {
        Ok(format!("new {}({})", class, join_values(args)))
    }

    fn cast(&mut self, value: &Value, to: &ValueType) -> Hook<String> {
        self.cast_text(value, to)
    }

    fn input(&mut self, prompt: Option<&Value>) -> Hook<String> {
        if self.platform == Platform::Node {
            self.requires
                .insert("var prompt = require(\"prompt-sync\")();".to_string());
        }
        Ok(match prompt {
            Some(prompt) => format!("prompt({})", prompt.text),
            None => "prompt()".to_string(),
        })
    }

    fn sizeof(&mut self, value: &Value) -> Hook<String> {
        Ok(format!("{}.length", value.text))
    }

    fn addr(&mut self, _value: &Value) -> Hook<String> {
        Err(Unsupported::new("taking addresses"))
    }

    fn binary(&mut self, op: Operator, lhs: &Value, rhs: &Value) -> Hook<String> {
        Ok(format!("{} {} {}", lhs.text, Self::operator(op), rhs.text))
    }

    fn unary(&mut self, op: Operator, operand: &Value) -> Hook<String> {
        Ok(format!("{}{}", Self::operator(op), operand.text))
    }

    fn power(&mut self, base: &Value, exponent: &Value) -> Hook<Value> {
        let ty = if base.ty == ValueType::Int && exponent.ty == ValueType::Int {
            ValueType::Int
        } else {
            ValueType::Float
        };
        Ok(Value::new(
            format!("Math.pow({}, {})", base.text, exponent.text),
            ty,
        ))
    }

    fn var_init(&mut self, name: &str, _ty: &ValueType) -> Hook<Lines> {
        Ok(vec![format!("var {} = null;", name)])
    }

    fn assign(
        &mut self,
        target: &AssignTarget,
        value: &Value,
        cast: Option<&ValueType>,
    ) -> Hook<Lines> {
        let expr = self.with_cast(value, cast)?;
        let keyword = if target.declare { "var " } else { "" };
        Ok(vec![format!("{}{} = {};", keyword, target.text, expr)])
    }

    fn index_assign(
        &mut self,
        base: &Value,
        index: &Value,
        value: &Value,
        cast: Option<&ValueType>,
    ) -> Hook<Lines> {
        let expr = self.with_cast(value, cast)?;
        Ok(vec![format!(
            "{}[{}] = {};",
            base.text,
            self.wrapped_index(base, index),
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
        Ok(vec![format!(
            "{}[{}] {}= {};",
            base.text,
            self.wrapped_index(base, index),
            Self::operator(op),
            value.text
        )])
    }

    fn array_append(&mut self, array: &Value, value: &Value) -> Hook<Lines> {
        Ok(vec![format!("{}.push({});", array.text, value.text)])
    }

    fn print(&mut self, args: &[Value]) -> Hook<Lines> {
        Ok(vec![format!("console.log({});", join_values(args))])
    }

    fn for_range(&mut self, var: &str, declare: bool, range: &RangeBounds) -> Hook<Lines> {
        let descending = range.step.as_int_literal().is_some_and(|s| s < 0);
        let comparison = if descending { ">" } else { "<" };
        let keyword = if declare { "var " } else { "" };
        self.loops.push(Loop::Range {
            var: var.to_string(),
            step: range.step.text.clone(),
        });
        Ok(vec![format!(
            "for ({k}{v} = {from}; {v} {cmp} {to}; {v} += {step}) {{",
            k = keyword,
            v = var,
            from = range.from.text,
            cmp = comparison,
            to = range.to.text,
            step = range.step.text
        )])
    }

    fn for_each(&mut self, var: &str, iterable: &Value, counter: &str) -> Hook<Lines> {
        let source = if iterable.ty == ValueType::Map {
            format!("Object.keys({})", iterable.text)
        } else {
            iterable.text.clone()
        };
        self.loops.push(Loop::Each);
        Ok(vec![
            format!(
                "for (var {c} = 0; {c} < {s}.length; {c}++) {{",
                c = counter,
                s = source
            ),
            format!("var {} = {}[{}];", var, source, counter),
        ])
    }

    fn end_for(&mut self) -> Hook<Lines> {
        Ok(vec![match self.loops.pop() {
            Some(Loop::Range { var, step }) => format!("}} {} -= {};", var, step),
            _ => "}".to_string(),
        }])
    }

    fn func_open(&mut self, header: &FuncHeader) -> Hook<Lines> {
        let params: Vec<&str> = header.params.iter().map(|p| p.name.as_str()).collect();
        let params = params.join(", ");
        let line = if header.constructor {
            format!("constructor({}) {{", params)
        } else if header.in_class {
            format!("{}({}) {{", header.name, params)
        } else {
            format!("function {}({}) {{", header.name, params)
        };
        Ok(vec![line])
    }

    fn default_value(&mut self, param: &str, value: &Value) -> Hook<Lines> {
        Ok(vec![format!(
            "if ({p} === undefined) {p} = {v};",
            p = param,
            v = value.text
        )])
    }

    fn class_open(&mut self, name: &str, parent: Option<&str>) -> Hook<Lines> {
        Ok(vec![match parent {
            Some(parent) => format!("class {} extends {} {{", name, parent),
            None => format!("class {} {{", name),
        }])
    }

    fn class_attribute(&mut self, name: &str, value: &Value) -> Hook<Lines> {
        Ok(vec![format!("{} = {};", name, value.text)])
    }

    fn delete(&mut self, target: &DeleteTarget) -> Hook<Lines> {
        let line = match target {
            DeleteTarget::Name(value) => format!("{} = undefined;", value.text),
            DeleteTarget::Attribute(value) => format!("delete {};", value.text),
            DeleteTarget::Element { base, index } if base.ty == ValueType::Map => {
                format!("delete {}[{}];", base.text, index.text)
            }
            DeleteTarget::Element { base, index } => format!(
                "{}.splice({}, 1);",
                base.text,
                self.wrapped_index(base, index)
            ),
        };
        Ok(vec![line])
    }

    fn system_import(&mut self, module: &str, alias: Option<&str>) -> Hook<String> {
        let binding = alias
            .or_else(|| module.rsplit('.').next())
            .unwrap_or(module);
        Ok(format!(
            "const {} = require(\"{}\");",
            binding,
            module.replace('.', "/")
        ))
    }

    fn prelude(&self) -> Lines {
        self.requires.iter().cloned().collect()
    }

    fn boilerplate(&self, _module: bool) -> (Lines, Lines) {
        (Vec::new(), Vec::new())
    }

    fn file_name(&self, module: Option<&str>) -> String {
        match module {
            Some(module) => format!("{}.js", module),
            None => "main.js".to_string(),
        }
    }
}
