//! Declarative Grammar - the ordered rule table
//!
//! The grammar is data: a list of (name, kind tuple, builder) entries. Order matters, since
//! the engine restarts from the top after every reduction and later rules rely on earlier ones
//! having already run:
//!
//! 1. comments and string literals (before anything can look inside quotes)
//! 2. operator fusion (`==`, `**`, `<=`, `+=`, ...)
//! 3. headers and keywords that must see raw identifiers (`int x`, `import`, `class`, ...)
//! 4. access chains, calls, casts, builtins and indexing
//! 5. atoms into expressions
//! 6. composite expressions (groups, containers, operators, ranges, argument lists)
//! 7. whole-line statements

use super::builders::{expressions as e, statements as s, strings};
use super::engine::Rule;
use crate::photon::token::Kind::*;

macro_rules! rule {
    ($name:literal, [$($kind:expr),+ $(,)?], $build:path) => {
        Rule {
            name: $name,
            pattern: &[$($kind),+],
            build: $build,
        }
    };
}

/// Grammar rules, in priority order.
pub const GRAMMAR_RULES: &[Rule] = &[
    // 1. comments and strings
    rule!("comment", [Hashtag, Text], s::comment),
    rule!("empty_comment", [Hashtag], s::comment),
    rule!("double_string", [DoubleQuote, Text, DoubleQuote], strings::string),
    rule!("single_string", [SingleQuote, Text, SingleQuote], strings::string),
    rule!("empty_double_string", [DoubleQuote, DoubleQuote], strings::empty_string),
    rule!("empty_single_string", [SingleQuote, SingleQuote], strings::empty_string),
    // 2. operator fusion
    rule!("equality", [Equal, Equal], e::equality),
    rule!("power", [Operator, Operator], e::power_operator),
    rule!("operator_equal", [Operator, Equal], e::operator_equal),
    // 3. headers and keywords
    rule!("typed_var", [Type, Var], e::typed_var),
    rule!("import", [Import, Var], s::import),
    rule!("import_as", [Import, Var, As, Var], s::import),
    rule!("import_dotted", [Import, DotAccess], s::import),
    rule!("import_dotted_as", [Import, DotAccess, As, Var], s::import),
    rule!("class", [Class, Var, BeginBlock], s::class),
    rule!("class_inherits", [Class, Var, LParen, Var, RParen, BeginBlock], s::class),
    rule!("declaration", [Var], s::declaration),
    rule!("else", [Else, BeginBlock], s::else_clause),
    rule!("break", [Break], s::keyword_only),
    rule!("continue", [Continue], s::keyword_only),
    rule!("bare_return", [Return], s::keyword_only),
    // 4. access chains, calls, indexing
    rule!("dot_access", [Var, Dot, Var], e::dot_access),
    rule!("dot_access_chain", [DotAccess, Dot, Var], e::dot_access),
    rule!("call_empty", [Var, LParen, RParen], e::call),
    rule!("call_single", [Var, LParen, Expr, RParen], e::call),
    rule!("call_args", [Var, LParen, Args, RParen], e::call),
    rule!("call_keyword", [Var, LParen, KeyVal, RParen], e::call),
    rule!("method_empty", [DotAccess, LParen, RParen], e::call),
    rule!("method_single", [DotAccess, LParen, Expr, RParen], e::call),
    rule!("method_args", [DotAccess, LParen, Args, RParen], e::call),
    rule!("method_keyword", [DotAccess, LParen, KeyVal, RParen], e::call),
    rule!("cast", [Type, LParen, Expr, RParen], e::cast),
    rule!("input_empty", [Input, LParen, RParen], e::builtin_call),
    rule!("input", [Input, LParen, Expr, RParen], e::builtin_call),
    rule!("sizeof", [Sizeof, LParen, Expr, RParen], e::builtin_call),
    rule!("addr", [Addr, LParen, Expr, RParen], e::builtin_call),
    rule!("index", [Var, LBracket, Expr, RBracket], e::index),
    rule!("index_attribute", [DotAccess, LBracket, Expr, RBracket], e::index),
    rule!("index_chain", [IndexAccess, LBracket, Expr, RBracket], e::index),
    // 5. atoms
    rule!("int_literal", [Num], e::int_literal),
    rule!("float_literal", [Float], e::float_literal),
    rule!("variable", [Var], e::variable),
    rule!("dot_value", [DotAccess], e::dot_value),
    rule!("index_value", [IndexAccess], e::index_value),
    // 6. composite expressions
    rule!("group", [LParen, Expr, RParen], e::group),
    rule!("empty_array", [LBracket, RBracket], e::array),
    rule!("array_single", [LBracket, Expr, RBracket], e::array),
    rule!("array", [LBracket, Args, RBracket], e::array),
    rule!("empty_map", [LBrace, RBrace], e::map),
    rule!("pair", [Expr, BeginBlock, Expr], e::pair),
    rule!("pairs", [Pair, Comma, Pair], e::pairs),
    rule!("pairs_chain", [Pairs, Comma, Pair], e::pairs),
    rule!("map_single", [LBrace, Pair, RBrace], e::map),
    rule!("map", [LBrace, Pairs, RBrace], e::map),
    rule!("unary", [Operator, Expr], e::unary),
    rule!("binary", [Expr, Operator, Expr], e::binary),
    rule!("range", [Expr, Dot, Dot, Expr], e::range),
    rule!("range_step", [Range, Dot, Dot, Expr], e::range_step),
    rule!("keyval", [Var, Equal, Expr], e::keyval),
    rule!("args", [Expr, Comma, Expr], e::args),
    rule!("args_keyword", [Expr, Comma, KeyVal], e::args),
    rule!("args_after_keyword", [KeyVal, Comma, Expr], e::args),
    rule!("keyword_args", [KeyVal, Comma, KeyVal], e::args),
    rule!("args_chain", [Args, Comma, Expr], e::args),
    rule!("args_chain_keyword", [Args, Comma, KeyVal], e::args),
    // 7. statements
    rule!("assign", [Var, Equal, Expr], s::assign),
    rule!("assign_attribute", [DotAccess, Equal, Expr], s::assign),
    rule!("assign_index", [IndexAccess, Equal, Expr], s::assign),
    rule!("aug_assign", [Var, AugEqual, Expr], s::aug_assign),
    rule!("aug_assign_attribute", [DotAccess, AugEqual, Expr], s::aug_assign),
    rule!("aug_assign_index", [IndexAccess, AugEqual, Expr], s::aug_assign),
    rule!("if", [If, Expr, BeginBlock], s::conditional),
    rule!("elif", [Elif, Expr, BeginBlock], s::conditional),
    rule!("while", [While, Expr, BeginBlock], s::conditional),
    rule!("for_range", [For, Var, In, Range, BeginBlock], s::for_loop),
    rule!("for_each", [For, Var, In, Expr, BeginBlock], s::for_loop),
    rule!("def_empty", [Def, Var, LParen, RParen, BeginBlock], s::def),
    rule!("def_single", [Def, Var, LParen, Expr, RParen, BeginBlock], s::def),
    rule!("def_keyword", [Def, Var, LParen, KeyVal, RParen, BeginBlock], s::def),
    rule!("def_args", [Def, Var, LParen, Args, RParen, BeginBlock], s::def),
    rule!("return", [Return, Expr], s::return_value),
    rule!("del", [Del, Expr], s::del),
    rule!("expression", [Expr], s::expression),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_names_are_unique() {
        let names: HashSet<_> = GRAMMAR_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), GRAMMAR_RULES.len());
    }

    #[test]
    fn test_statements_close_the_table() {
        let last = GRAMMAR_RULES.last().unwrap();
        assert_eq!(last.name, "expression");
    }
}
