//! Value types
//!
//!     The driver evaluates every expression to a [Value]: the target-language text plus a
//!     closed [ValueType] tag (and the element tag for containers). Types drive declaration,
//!     cast insertion, indexing and the choice between append / constructor / plain call.

use std::fmt;

use photon_parser::photon::token::TypeName;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Str,
    Bool,
    Array,
    Map,
    Class(String),
    Func,
    Null,
    Unknown,
}

impl ValueType {
    pub fn is_known(&self) -> bool {
        !matches!(self, ValueType::Unknown | ValueType::Null)
    }

    /// Types a cast can convert between.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueType::Int | ValueType::Float | ValueType::Str | ValueType::Bool
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }

    /// Cast needed to store a `value` of this type where `target` is expected.
    pub fn cast_to(&self, target: &ValueType) -> Option<ValueType> {
        if self.is_scalar() && target.is_scalar() && self != target {
            Some(target.clone())
        } else {
            None
        }
    }

    /// The common type of a sequence, if every item agrees.
    pub fn common<'a>(mut types: impl Iterator<Item = &'a ValueType>) -> Option<ValueType> {
        let first = types.next()?.clone();
        types.all(|t| *t == first).then_some(first)
    }
}

impl From<TypeName> for ValueType {
    fn from(name: TypeName) -> Self {
        match name {
            TypeName::Int | TypeName::Uint | TypeName::Ulong | TypeName::Ubyte => ValueType::Int,
            TypeName::Float | TypeName::Double => ValueType::Float,
            TypeName::Str | TypeName::Cstr | TypeName::Char => ValueType::Str,
            TypeName::Bool => ValueType::Bool,
            TypeName::Func => ValueType::Func,
            TypeName::Const | TypeName::Struct | TypeName::File => ValueType::Unknown,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Str => write!(f, "str"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Array => write!(f, "array"),
            ValueType::Map => write!(f, "map"),
            ValueType::Class(name) => write!(f, "{}", name),
            ValueType::Func => write!(f, "func"),
            ValueType::Null => write!(f, "null"),
            ValueType::Unknown => write!(f, "unknown"),
        }
    }
}

/// An evaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub text: String,
    pub ty: ValueType,
    pub element: Option<ValueType>,
    /// Binding power of the outermost operator in `text`; `None` for atoms.
    pub binding: Option<u8>,
}

impl Value {
    pub fn new(text: impl Into<String>, ty: ValueType) -> Self {
        Value {
            text: text.into(),
            ty,
            element: None,
            binding: None,
        }
    }

    pub fn with_binding(mut self, binding: u8) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Parenthesize when the outermost operator binds looser than `min`, or as loose
    /// when `tie` is set.
    pub fn bound(self, min: u8, tie: bool) -> Self {
        let wrap = match self.binding {
            Some(binding) => binding < min || (tie && binding == min),
            None => false,
        };
        if !wrap {
            return self;
        }
        Value {
            text: format!("({})", self.text),
            binding: None,
            ..self
        }
    }

    pub fn with_element(mut self, element: Option<ValueType>) -> Self {
        self.element = element;
        self
    }

    /// Integer literal value, including a leading minus sign.
    pub fn as_int_literal(&self) -> Option<i64> {
        if self.ty != ValueType::Int {
            return None;
        }
        self.text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_map_to_value_types() {
        assert_eq!(ValueType::from(TypeName::Double), ValueType::Float);
        assert_eq!(ValueType::from(TypeName::Ubyte), ValueType::Int);
        assert_eq!(ValueType::from(TypeName::Cstr), ValueType::Str);
        assert_eq!(ValueType::from(TypeName::File), ValueType::Unknown);
    }

    #[test]
    fn test_casts_only_between_known_scalars() {
        assert_eq!(
            ValueType::Int.cast_to(&ValueType::Float),
            Some(ValueType::Float)
        );
        assert_eq!(ValueType::Int.cast_to(&ValueType::Int), None);
        assert_eq!(ValueType::Unknown.cast_to(&ValueType::Int), None);
        assert_eq!(ValueType::Array.cast_to(&ValueType::Str), None);
    }

    #[test]
    fn test_common_type() {
        let same = [ValueType::Int, ValueType::Int];
        assert_eq!(ValueType::common(same.iter()), Some(ValueType::Int));
        let mixed = [ValueType::Int, ValueType::Float];
        assert_eq!(ValueType::common(mixed.iter()), None);
        let empty: [ValueType; 0] = [];
        assert_eq!(ValueType::common(empty.iter()), None);
    }

    #[test]
    fn test_bound_wraps_looser_operators() {
        let sum = Value::new("a + b", ValueType::Int).with_binding(11);
        assert_eq!(sum.clone().bound(12, false).text, "(a + b)");
        assert_eq!(sum.clone().bound(11, false).text, "a + b");
        assert_eq!(sum.bound(11, true).text, "(a + b)");
        assert_eq!(Value::new("a", ValueType::Int).bound(14, true).text, "a");
    }

    #[test]
    fn test_int_literal() {
        assert_eq!(Value::new("-1", ValueType::Int).as_int_literal(), Some(-1));
        assert_eq!(Value::new("i", ValueType::Int).as_int_literal(), None);
        assert_eq!(Value::new("2", ValueType::Float).as_int_literal(), None);
    }
}
