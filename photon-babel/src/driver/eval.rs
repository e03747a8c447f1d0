//! Expression evaluation: every [Expr] becomes a typed [Value].

use photon_parser::photon::ast::{Arg, Expr, StrPart};
use photon_parser::photon::token::{Builtin, Operator};

use super::state::{Emitter, Signature};
use crate::backend::StrSegment;
use crate::error::{TranspileError, Unsupported};
use crate::types::{Value, ValueType};

type EvalResult = Result<Value, TranspileError>;

impl Emitter<'_> {
    pub(crate) fn eval(&mut self, expr: &Expr) -> EvalResult {
        let opcode = expr.opcode();
        match expr {
            Expr::Int { value } => Ok(Value::new(value.clone(), ValueType::Int)),
            Expr::Float { value } => Ok(Value::new(value.clone(), ValueType::Float)),
            Expr::Bool { value } => {
                let text = if *value {
                    self.backend.true_literal()
                } else {
                    self.backend.false_literal()
                };
                Ok(Value::new(text, ValueType::Bool))
            }
            Expr::Null => Ok(Value::new(self.backend.null_literal(), ValueType::Null)),
            Expr::Str(literal) => {
                let mut segments = Vec::with_capacity(literal.parts.len());
                for part in &literal.parts {
                    segments.push(match part {
                        StrPart::Text(text) => StrSegment::Text(text.clone()),
                        StrPart::Value(expr) => StrSegment::Value(self.eval(expr)?),
                    });
                }
                let text = self.backend.format_str(literal.quote, &segments);
                Ok(Value::new(self.check(text, opcode)?, ValueType::Str))
            }
            Expr::Var { name, .. } => Ok(self.name(name)),
            Expr::DotAccess { path } => self.dot_access(path, opcode),
            Expr::Index { base, index } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?;
                let text = self.backend.index_access(&base, &index);
                let ty = match base.ty {
                    ValueType::Array => base.element.clone().unwrap_or(ValueType::Unknown),
                    ValueType::Str => ValueType::Str,
                    _ => ValueType::Unknown,
                };
                Ok(Value::new(self.check(text, opcode)?, ty))
            }
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::Cast { to, expr } => {
                let value = self.eval(expr)?;
                let to = ValueType::from(*to);
                let text = self.backend.cast(&value, &to);
                Ok(Value::new(self.check(text, opcode)?, to))
            }
            Expr::Builtin { builtin, arg } => {
                let arg = match arg {
                    Some(arg) => Some(self.eval(arg)?),
                    None => None,
                };
                self.builtin(*builtin, arg.as_ref())
            }
            Expr::Unary { op, expr } => {
                let binding = self.backend.binding_power(*op, true);
                let operand = prefix_operand(self.eval(expr)?, binding);
                let text = self.backend.unary(*op, &operand);
                let ty = if op.is_logical() {
                    ValueType::Bool
                } else {
                    operand.ty
                };
                Ok(Value::new(self.check(text, opcode)?, ty).with_binding(binding))
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                if *op == Operator::Pow {
                    let power = self.backend.power(&lhs, &rhs);
                    return self.check(power, opcode);
                }
                let binding = self.backend.binding_power(*op, false);
                let lhs = lhs.bound(binding, false);
                let rhs = rhs.bound(binding, true);
                let text = self.backend.binary(*op, &lhs, &rhs);
                let ty = binary_type(*op, &lhs.ty, &rhs.ty);
                Ok(Value::new(self.check(text, opcode)?, ty).with_binding(binding))
            }
            Expr::Group { expr } => {
                let inner = self.eval(expr)?;
                Ok(Value::new(format!("({})", inner.text), inner.ty).with_element(inner.element))
            }
            Expr::Array { elements } => {
                let values = self.eval_all(elements)?;
                let element = ValueType::common(values.iter().map(|v| &v.ty));
                let text = self.backend.array(&values, element.as_ref());
                Ok(Value::new(self.check(text, opcode)?, ValueType::Array).with_element(element))
            }
            Expr::Map { pairs } => {
                let mut values = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    values.push((self.eval(key)?, self.eval(value)?));
                }
                let element = ValueType::common(values.iter().map(|(_, v)| &v.ty));
                let text = self.backend.map(&values);
                Ok(Value::new(self.check(text, opcode)?, ValueType::Map).with_element(element))
            }
        }
    }

    pub(crate) fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, TranspileError> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    fn name(&self, name: &str) -> Value {
        if name == "self" {
            return match self.scopes.current_class() {
                Some(class) => Value::new(
                    self.backend.self_name(),
                    ValueType::Class(class.to_string()),
                ),
                None => Value::new(name, ValueType::Unknown),
            };
        }
        if let Some(binding) = self.scopes.lookup(name) {
            return Value::new(name, binding.ty.clone()).with_element(binding.element.clone());
        }
        if self.records.classes.contains_key(name) {
            return Value::new(name, ValueType::Class(name.to_string()));
        }
        if self.records.functions.contains_key(name) {
            return Value::new(name, ValueType::Func);
        }
        Value::new(name, ValueType::Unknown)
    }

    /// Type of `path` walked through the recorded class members.
    fn path_type(&self, path: &[String]) -> (ValueType, Option<ValueType>) {
        let Some((first, rest)) = path.split_first() else {
            return (ValueType::Unknown, None);
        };
        let root = self.name(first);
        let mut current = (root.ty, root.element);
        for (i, segment) in rest.iter().enumerate() {
            let ValueType::Class(class) = current.0.clone() else {
                return (ValueType::Unknown, None);
            };
            if let Some(binding) = self.records.member(&class, segment) {
                current = (binding.ty.clone(), binding.element.clone());
            } else if i + 1 == rest.len() && self.records.method(&class, segment).is_some() {
                current = (ValueType::Func, None);
            } else {
                return (ValueType::Unknown, None);
            }
        }
        current
    }

    fn dot_access(&mut self, path: &[String], opcode: &str) -> EvalResult {
        let text = self.backend.dot_access(path);
        let text = self.check(text, opcode)?;
        let (ty, element) = self.path_type(path);
        Ok(Value::new(text, ty).with_element(element))
    }

    fn builtin(&mut self, builtin: Builtin, arg: Option<&Value>) -> EvalResult {
        let opcode = builtin.as_str();
        let missing = || Unsupported::new(format!("`{}` without an argument", opcode));
        let (text, ty) = match builtin {
            Builtin::Input => (self.backend.input(arg), ValueType::Str),
            Builtin::Sizeof => match arg {
                Some(arg) => (self.backend.sizeof(arg), ValueType::Int),
                None => (Err(missing()), ValueType::Int),
            },
            Builtin::Addr => match arg {
                Some(arg) => (self.backend.addr(arg), ValueType::Unknown),
                None => (Err(missing()), ValueType::Unknown),
            },
        };
        Ok(Value::new(self.check(text, opcode)?, ty))
    }

    fn call(&mut self, callee: &Expr, args: &[Arg]) -> EvalResult {
        match callee {
            Expr::Var { name, .. } if self.records.classes.contains_key(name) => {
                let signature = self.records.constructor(name).cloned();
                let values = self.arrange(args, signature.as_ref(), true)?;
                let text = self.backend.new_instance(name, &values);
                Ok(Value::new(
                    self.check(text, "call")?,
                    ValueType::Class(name.clone()),
                ))
            }
            Expr::Var { name, .. } => {
                let signature = self.records.functions.get(name).cloned();
                self.plain_call(name, args, signature)
            }
            Expr::DotAccess { path } if path.len() > 1 => {
                let (owner, method) = path.split_at(path.len() - 1);
                let signature = match self.path_type(owner).0 {
                    ValueType::Class(class) => self.records.method(&class, &method[0]).cloned(),
                    _ => None,
                };
                let callee = self.backend.dot_access(path);
                let callee = self.check(callee, "call")?;
                self.plain_call(&callee, args, signature)
            }
            other => {
                let callee = self.eval(other)?;
                self.plain_call(&callee.text, args, None)
            }
        }
    }

    fn plain_call(
        &mut self,
        callee: &str,
        args: &[Arg],
        signature: Option<Signature>,
    ) -> EvalResult {
        let values = self.arrange(args, signature.as_ref(), false)?;
        let text = self.backend.call(callee, &values);
        let ty = signature
            .map(|s| s.return_type)
            .unwrap_or(ValueType::Unknown);
        Ok(Value::new(self.check(text, "call")?, ty))
    }

    /// Evaluate call arguments in parameter order.
    ///
    /// Keyword arguments are moved to their parameter's position. Gaps before the last
    /// supplied argument take the parameter's default (or null); trailing gaps are left off.
    fn arrange(
        &mut self,
        args: &[Arg],
        signature: Option<&Signature>,
        constructor: bool,
    ) -> Result<Vec<Value>, TranspileError> {
        let has_keywords = args.iter().any(|a| matches!(a, Arg::Keyword { .. }));
        let Some(signature) = signature.filter(|_| has_keywords) else {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                match arg {
                    Arg::Positional(expr) => values.push(self.eval(expr)?),
                    Arg::Keyword { name, .. } => {
                        return Err(self.unknown_keyword(name, constructor));
                    }
                }
            }
            return Ok(values);
        };

        let mut slots: Vec<Option<Value>> = vec![None; signature.params.len()];
        let mut next = 0;
        for arg in args {
            let (position, expr) = match arg {
                Arg::Positional(expr) => {
                    let position = next;
                    next += 1;
                    (position, expr)
                }
                Arg::Keyword { name, value } => {
                    let position = signature
                        .params
                        .iter()
                        .position(|p| p.name == *name)
                        .ok_or_else(|| self.unknown_keyword(name, constructor))?;
                    (position, value)
                }
            };
            let value = self.eval(expr)?;
            if position >= slots.len() {
                slots.resize(position + 1, None);
            }
            slots[position] = Some(value);
        }

        let supplied = slots.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        let mut values = Vec::with_capacity(supplied);
        for (i, slot) in slots.into_iter().take(supplied).enumerate() {
            let value = match (slot, signature.params.get(i).and_then(|p| p.default.as_ref())) {
                (Some(value), _) => value,
                (None, Some(default)) => self.eval(default)?,
                (None, None) => Value::new(self.backend.null_literal(), ValueType::Null),
            };
            values.push(value);
        }
        Ok(values)
    }

    fn unknown_keyword(&self, name: &str, constructor: bool) -> TranspileError {
        let what = if constructor { "constructor" } else { "function" };
        TranspileError::UnsupportedFeature {
            feature: format!("keyword argument `{}` for a {} without that parameter", name, what),
            opcode: "call".to_string(),
            target: self.target.clone(),
        }
    }
}

/// Operand of a prefix operator. Nested prefixes and signed literals are wrapped so
/// `- -a` never comes out as a decrement.
fn prefix_operand(operand: Value, binding: u8) -> Value {
    if operand.text.starts_with(['-', '+', '!', '~']) {
        return Value {
            text: format!("({})", operand.text),
            binding: None,
            ..operand
        };
    }
    operand.bound(binding, true)
}

/// Result type of a binary operation other than `**`.
pub(crate) fn binary_type(op: Operator, lhs: &ValueType, rhs: &ValueType) -> ValueType {
    match op {
        _ if op.is_comparison() || op.is_logical() => ValueType::Bool,
        Operator::BitAnd | Operator::BitOr | Operator::BitXor => ValueType::Int,
        Operator::Add if *lhs == ValueType::Str || *rhs == ValueType::Str => ValueType::Str,
        _ if lhs.is_numeric() && rhs.is_numeric() => {
            if *lhs == ValueType::Float || *rhs == ValueType::Float {
                ValueType::Float
            } else {
                ValueType::Int
            }
        }
        _ if lhs.is_known() => lhs.clone(),
        _ => rhs.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operator::Add, ValueType::Int, ValueType::Int, ValueType::Int)]
    #[case(Operator::Mul, ValueType::Int, ValueType::Float, ValueType::Float)]
    #[case(Operator::Add, ValueType::Str, ValueType::Int, ValueType::Str)]
    #[case(Operator::Lt, ValueType::Int, ValueType::Int, ValueType::Bool)]
    #[case(Operator::And, ValueType::Bool, ValueType::Unknown, ValueType::Bool)]
    #[case(Operator::Sub, ValueType::Unknown, ValueType::Float, ValueType::Float)]
    fn test_binary_result_types(
        #[case] op: Operator,
        #[case] lhs: ValueType,
        #[case] rhs: ValueType,
        #[case] expected: ValueType,
    ) {
        assert_eq!(binary_type(op, &lhs, &rhs), expected);
    }
}
