//! Expression nodes

use serde::Serialize;
use std::fmt;

use crate::photon::token::{Builtin, Operator, TypeName};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "opcode", rename_all = "camelCase")]
pub enum Expr {
    Int {
        value: String,
    },
    Float {
        value: String,
    },
    Str(StrLiteral),
    Bool {
        value: bool,
    },
    Null,
    Var {
        name: String,
        #[serde(rename = "type")]
        declared: Option<TypeName>,
    },
    DotAccess {
        path: Vec<String>,
    },
    #[serde(rename = "indexAccess")]
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },
    Cast {
        to: TypeName,
        expr: Box<Expr>,
    },
    Builtin {
        builtin: Builtin,
        arg: Option<Box<Expr>>,
    },
    Unary {
        op: Operator,
        expr: Box<Expr>,
    },
    Binary {
        op: Operator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Group {
        expr: Box<Expr>,
    },
    Array {
        elements: Vec<Expr>,
    },
    Map {
        pairs: Vec<(Expr, Expr)>,
    },
}

/// A quoted string, split into literal text and interpolated expressions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrLiteral {
    pub quote: char,
    pub parts: Vec<StrPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrPart {
    Text(String),
    Value(Expr),
}

impl StrLiteral {
    pub fn plain(quote: char, text: impl Into<String>) -> Self {
        let text = text.into();
        let parts = if text.is_empty() {
            Vec::new()
        } else {
            vec![StrPart::Text(text)]
        };
        Self { quote, parts }
    }

    pub fn is_interpolated(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, StrPart::Value(_)))
    }
}

/// A call argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Arg {
    Positional(Expr),
    Keyword { name: String, value: Expr },
}

/// `from..to[..step]`. The step defaults to `1` when omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeExpr {
    pub from: Expr,
    pub to: Expr,
    pub step: Expr,
}

impl Expr {
    pub fn int(value: impl Into<String>) -> Self {
        Expr::Int {
            value: value.into(),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var {
            name: name.into(),
            declared: None,
        }
    }

    pub fn opcode(&self) -> &'static str {
        match self {
            Expr::Int { .. } => "int",
            Expr::Float { .. } => "float",
            Expr::Str(_) => "str",
            Expr::Bool { .. } => "bool",
            Expr::Null => "null",
            Expr::Var { .. } => "var",
            Expr::DotAccess { .. } => "dotAccess",
            Expr::Index { .. } => "indexAccess",
            Expr::Call { .. } => "call",
            Expr::Cast { .. } => "cast",
            Expr::Builtin { builtin, .. } => builtin.as_str(),
            Expr::Unary { .. } => "unary",
            Expr::Binary { .. } => "binary",
            Expr::Group { .. } => "group",
            Expr::Array { .. } => "array",
            Expr::Map { .. } => "map",
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Renders expressions back to photon source; used by diagnostics.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int { value } | Expr::Float { value } => write!(f, "{}", value),
            Expr::Str(s) => write!(f, "{}", s),
            Expr::Bool { value } => write!(f, "{}", value),
            Expr::Null => write!(f, "null"),
            Expr::Var { name, declared } => match declared {
                Some(ty) => write!(f, "{} {}", ty.as_str(), name),
                None => write!(f, "{}", name),
            },
            Expr::DotAccess { path } => write!(f, "{}", path.join(".")),
            Expr::Index { base, index } => write!(f, "{}[{}]", base, index),
            Expr::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Cast { to, expr } => write!(f, "{}({})", to.as_str(), expr),
            Expr::Builtin { builtin, arg } => match arg {
                Some(arg) => write!(f, "{}({})", builtin.as_str(), arg),
                None => write!(f, "{}()", builtin.as_str()),
            },
            Expr::Unary { op, expr } => match op {
                Operator::Not => write!(f, "not {}", expr),
                _ => write!(f, "{}{}", op.as_str(), expr),
            },
            Expr::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.as_str(), rhs),
            Expr::Group { expr } => write!(f, "({})", expr),
            Expr::Array { elements } => {
                write!(f, "[")?;
                write_list(f, elements)?;
                write!(f, "]")
            }
            Expr::Map { pairs } => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for StrLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quote)?;
        for part in &self.parts {
            match part {
                StrPart::Text(text) => write!(f, "{}", text)?,
                StrPart::Value(expr) => write!(f, "{{{}}}", expr)?,
            }
        }
        write!(f, "{}", self.quote)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Positional(expr) => write!(f, "{}", expr),
            Arg::Keyword { name, value } => write!(f, "{}={}", name, value),
        }
    }
}

impl fmt::Display for RangeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)?;
        match &self.step {
            Expr::Int { value } if value == "1" => Ok(()),
            step => write!(f, "..{}", step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_source_form() {
        let expr = Expr::Call {
            callee: Box::new(Expr::var("f")),
            args: vec![
                Arg::Positional(Expr::int("1")),
                Arg::Keyword {
                    name: "b".to_string(),
                    value: Expr::Binary {
                        op: Operator::Add,
                        lhs: Box::new(Expr::var("x")),
                        rhs: Box::new(Expr::int("2")),
                    },
                },
            ],
        };
        assert_eq!(expr.to_string(), "f(1, b=x + 2)");
    }

    #[test]
    fn test_range_display_omits_unit_step() {
        let mut range = RangeExpr {
            from: Expr::var("a"),
            to: Expr::var("b"),
            step: Expr::int("1"),
        };
        assert_eq!(range.to_string(), "a..b");
        range.step = Expr::int("-2");
        assert_eq!(range.to_string(), "a..b..-2");
    }

    #[test]
    fn test_interpolated_string_display() {
        let lit = StrLiteral {
            quote: '"',
            parts: vec![
                StrPart::Text("hi ".to_string()),
                StrPart::Value(Expr::var("name")),
            ],
        };
        assert!(lit.is_interpolated());
        assert_eq!(lit.to_string(), "\"hi {name}\"");
    }
}
