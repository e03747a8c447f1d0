//! Core token definitions
//!
//!     A tokenized line is a flat, ordered list of [Token]s. The first token is always
//!     [Token::Indent], carrying the leading whitespace count of the line. The rest are
//!     produced by the classification stage of the lexer (keywords, operators, type names,
//!     symbols, builtins, inferred literals and identifiers) or synthesized by the grammar
//!     reducer as it folds windows of tokens into phrases (expressions, argument lists,
//!     statements).
//!
//!     Pattern matching in the reducer never looks at payloads, only at [Kind]s. Every token
//!     maps to exactly one kind; keywords and symbols get a kind each because grammar rules
//!     name them individually, while operators, types and inferred literals share one kind
//!     per category.

use serde::Serialize;

use crate::photon::ast::{Arg, Expr, Node, RangeExpr};

/// Reserved statement words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    If,
    Elif,
    Else,
    Def,
    For,
    In,
    As,
    Return,
    Import,
    Class,
    While,
    Break,
    Continue,
    Try,
    Del,
}

impl Keyword {
    pub const ALL: [Keyword; 15] = [
        Keyword::If,
        Keyword::Elif,
        Keyword::Else,
        Keyword::Def,
        Keyword::For,
        Keyword::In,
        Keyword::As,
        Keyword::Return,
        Keyword::Import,
        Keyword::Class,
        Keyword::While,
        Keyword::Break,
        Keyword::Continue,
        Keyword::Try,
        Keyword::Del,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::Def => "def",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::As => "as",
            Keyword::Return => "return",
            Keyword::Import => "import",
            Keyword::Class => "class",
            Keyword::While => "while",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Try => "try",
            Keyword::Del => "del",
        }
    }

    pub fn from_spelling(word: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == word)
    }
}

/// Operator associativity, used by the binary-operator guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Arithmetic, comparison, logical and bitwise operators.
///
/// The lexer only produces the single-spelling operators. `**`, `==`, `!=`, `<=` and `>=`
/// are combined by the reducer from two adjacent tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Not,
    Bang,
    Tilde,
    And,
    Or,
    Is,
    BitAnd,
    BitOr,
    BitXor,
}

impl Operator {
    /// Spellings the lexer can classify directly.
    pub const LEXED: [Operator; 16] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mod,
        Operator::Div,
        Operator::Mul,
        Operator::Lt,
        Operator::Gt,
        Operator::Not,
        Operator::Bang,
        Operator::Tilde,
        Operator::And,
        Operator::Or,
        Operator::Is,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::BitXor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "**",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Not => "not",
            Operator::Bang => "!",
            Operator::Tilde => "~",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Is => "is",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
        }
    }

    pub fn from_spelling(word: &str) -> Option<Self> {
        Self::LEXED.iter().copied().find(|op| op.as_str() == word)
    }

    /// Operators that only ever prefix an expression.
    pub fn is_prefix_only(&self) -> bool {
        matches!(self, Operator::Not | Operator::Bang | Operator::Tilde)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Lt
                | Operator::Gt
                | Operator::Le
                | Operator::Ge
                | Operator::Eq
                | Operator::Ne
                | Operator::Is
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Not | Operator::Bang)
    }

    /// Operators allowed in front of `=` in an augmented assignment.
    pub fn is_augmentable(&self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Sub
                | Operator::Mul
                | Operator::Div
                | Operator::Mod
                | Operator::Pow
                | Operator::BitAnd
                | Operator::BitOr
                | Operator::BitXor
        )
    }

    /// Binding power when used as an infix operator; higher binds tighter.
    pub fn binary_power(&self) -> Option<(u8, Assoc)> {
        let power = match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Lt
            | Operator::Gt
            | Operator::Le
            | Operator::Ge
            | Operator::Eq
            | Operator::Ne
            | Operator::Is => 4,
            Operator::BitOr => 5,
            Operator::BitXor => 6,
            Operator::BitAnd => 7,
            Operator::Add | Operator::Sub => 8,
            Operator::Mul | Operator::Div | Operator::Mod => 9,
            Operator::Pow => return Some((11, Assoc::Right)),
            Operator::Not | Operator::Bang | Operator::Tilde => return None,
        };
        Some((power, Assoc::Left))
    }

    /// Binding power when used as a prefix operator.
    pub fn unary_power(&self) -> Option<u8> {
        match self {
            Operator::Not => Some(3),
            Operator::Sub | Operator::Bang | Operator::Tilde => Some(10),
            _ => None,
        }
    }
}

/// Single-character structural symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Symbol {
    Dot,
    Equal,
    BeginBlock,
    LParen,
    RParen,
    Comma,
    LBracket,
    RBracket,
    SingleQuote,
    DoubleQuote,
    Hashtag,
    LBrace,
    RBrace,
    GreaterThan,
    LessThan,
}

impl Symbol {
    pub const ALL: [Symbol; 15] = [
        Symbol::Dot,
        Symbol::Equal,
        Symbol::BeginBlock,
        Symbol::LParen,
        Symbol::RParen,
        Symbol::Comma,
        Symbol::LBracket,
        Symbol::RBracket,
        Symbol::SingleQuote,
        Symbol::DoubleQuote,
        Symbol::Hashtag,
        Symbol::LBrace,
        Symbol::RBrace,
        Symbol::GreaterThan,
        Symbol::LessThan,
    ];

    pub fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Equal => '=',
            Symbol::BeginBlock => ':',
            Symbol::LParen => '(',
            Symbol::RParen => ')',
            Symbol::Comma => ',',
            Symbol::LBracket => '[',
            Symbol::RBracket => ']',
            Symbol::SingleQuote => '\'',
            Symbol::DoubleQuote => '"',
            Symbol::Hashtag => '#',
            Symbol::LBrace => '{',
            Symbol::RBrace => '}',
            Symbol::GreaterThan => '>',
            Symbol::LessThan => '<',
        }
    }

    pub fn from_spelling(word: &str) -> Option<Self> {
        let mut chars = word.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.iter().copied().find(|s| s.as_char() == c)
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, Symbol::SingleQuote | Symbol::DoubleQuote)
    }
}

/// Built-in type spellings usable in declarations, parameters and casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Str,
    Cstr,
    Const,
    Struct,
    Char,
    Int,
    Float,
    Double,
    Func,
    Uint,
    Ulong,
    Ubyte,
    File,
    Bool,
}

impl TypeName {
    pub const ALL: [TypeName; 14] = [
        TypeName::Str,
        TypeName::Cstr,
        TypeName::Const,
        TypeName::Struct,
        TypeName::Char,
        TypeName::Int,
        TypeName::Float,
        TypeName::Double,
        TypeName::Func,
        TypeName::Uint,
        TypeName::Ulong,
        TypeName::Ubyte,
        TypeName::File,
        TypeName::Bool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Str => "str",
            TypeName::Cstr => "cstr",
            TypeName::Const => "const",
            TypeName::Struct => "struct",
            TypeName::Char => "char",
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Double => "double",
            TypeName::Func => "func",
            TypeName::Uint => "uint",
            TypeName::Ulong => "ulong",
            TypeName::Ubyte => "ubyte",
            TypeName::File => "file",
            TypeName::Bool => "bool",
        }
    }

    pub fn from_spelling(word: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == word)
    }
}

/// Built-in calls with dedicated grammar rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    Input,
    Sizeof,
    Addr,
}

impl Builtin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Builtin::Input => "input",
            Builtin::Sizeof => "sizeof",
            Builtin::Addr => "addr",
        }
    }

    pub fn from_spelling(word: &str) -> Option<Self> {
        [Builtin::Input, Builtin::Sizeof, Builtin::Addr]
            .into_iter()
            .find(|b| b.as_str() == word)
    }
}

/// A classified or synthesized token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    /// Leading whitespace count; always the first token of a line.
    Indent(usize),
    Keyword(Keyword),
    Operator(Operator),
    /// An operator fused with a following `=` (`+=`, `-=`, ...).
    AugEqual(Operator),
    Type(TypeName),
    Symbol(Symbol),
    Builtin(Builtin),
    Num(String),
    Float(String),
    Var {
        name: String,
        declared: Option<TypeName>,
    },
    /// Verbatim content of a quoted region or a comment.
    Text(String),

    // Phrases synthesized by the reducer
    Expr(Expr),
    DotAccess(Vec<String>),
    IndexAccess(Expr),
    Args(Vec<Arg>),
    KeyVal(Arg),
    Pair(Expr, Expr),
    Pairs(Vec<(Expr, Expr)>),
    Range(RangeExpr),
    Statement(Node),
}

/// The payload-free view of a token used for pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Indent,
    // keywords
    If,
    Elif,
    Else,
    Def,
    For,
    In,
    As,
    Return,
    Import,
    Class,
    While,
    Break,
    Continue,
    Try,
    Del,
    // categories
    Operator,
    AugEqual,
    Type,
    // symbols
    Dot,
    Equal,
    BeginBlock,
    LParen,
    RParen,
    Comma,
    LBracket,
    RBracket,
    SingleQuote,
    DoubleQuote,
    Hashtag,
    LBrace,
    RBrace,
    GreaterThan,
    LessThan,
    // builtins
    Input,
    Sizeof,
    Addr,
    // inferred
    Num,
    Float,
    Var,
    Text,
    // phrases
    Expr,
    DotAccess,
    IndexAccess,
    Args,
    KeyVal,
    Pair,
    Pairs,
    Range,
    Statement,
}

impl Token {
    pub fn kind(&self) -> Kind {
        match self {
            Token::Indent(_) => Kind::Indent,
            Token::Keyword(k) => match k {
                Keyword::If => Kind::If,
                Keyword::Elif => Kind::Elif,
                Keyword::Else => Kind::Else,
                Keyword::Def => Kind::Def,
                Keyword::For => Kind::For,
                Keyword::In => Kind::In,
                Keyword::As => Kind::As,
                Keyword::Return => Kind::Return,
                Keyword::Import => Kind::Import,
                Keyword::Class => Kind::Class,
                Keyword::While => Kind::While,
                Keyword::Break => Kind::Break,
                Keyword::Continue => Kind::Continue,
                Keyword::Try => Kind::Try,
                Keyword::Del => Kind::Del,
            },
            Token::Operator(_) => Kind::Operator,
            Token::AugEqual(_) => Kind::AugEqual,
            Token::Type(_) => Kind::Type,
            Token::Symbol(s) => match s {
                Symbol::Dot => Kind::Dot,
                Symbol::Equal => Kind::Equal,
                Symbol::BeginBlock => Kind::BeginBlock,
                Symbol::LParen => Kind::LParen,
                Symbol::RParen => Kind::RParen,
                Symbol::Comma => Kind::Comma,
                Symbol::LBracket => Kind::LBracket,
                Symbol::RBracket => Kind::RBracket,
                Symbol::SingleQuote => Kind::SingleQuote,
                Symbol::DoubleQuote => Kind::DoubleQuote,
                Symbol::Hashtag => Kind::Hashtag,
                Symbol::LBrace => Kind::LBrace,
                Symbol::RBrace => Kind::RBrace,
                Symbol::GreaterThan => Kind::GreaterThan,
                Symbol::LessThan => Kind::LessThan,
            },
            Token::Builtin(b) => match b {
                Builtin::Input => Kind::Input,
                Builtin::Sizeof => Kind::Sizeof,
                Builtin::Addr => Kind::Addr,
            },
            Token::Num(_) => Kind::Num,
            Token::Float(_) => Kind::Float,
            Token::Var { .. } => Kind::Var,
            Token::Text(_) => Kind::Text,
            Token::Expr(_) => Kind::Expr,
            Token::DotAccess(_) => Kind::DotAccess,
            Token::IndexAccess(_) => Kind::IndexAccess,
            Token::Args(_) => Kind::Args,
            Token::KeyVal(_) => Kind::KeyVal,
            Token::Pair(..) => Kind::Pair,
            Token::Pairs(_) => Kind::Pairs,
            Token::Range(_) => Kind::Range,
            Token::Statement(_) => Kind::Statement,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Token::Var {
            name: name.into(),
            declared: None,
        }
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        matches!(self, Token::Symbol(s) if *s == symbol)
    }

    /// True for tokens that can end an operand, i.e. a following operator is infix.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self.kind(),
            Kind::Expr
                | Kind::Var
                | Kind::Num
                | Kind::Float
                | Kind::DotAccess
                | Kind::IndexAccess
                | Kind::RParen
                | Kind::RBracket
                | Kind::RBrace
        )
    }
}
