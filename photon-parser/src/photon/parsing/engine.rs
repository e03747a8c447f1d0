//! Reduction engine
//!
//!     The engine folds a tokenized line into a single statement by repeatedly replacing a
//!     window of tokens with one synthesized token:
//!
//!         1. Compute the kind sequence of the line, leaving out the leading indent.
//!         2. Walk the rules in table order; for each rule walk every window position left
//!            to right, comparing kinds for exact equality with the rule's pattern.
//!         3. On the first match, call the rule's builder. A builder may decline the window
//!            (`Ok(None)`), in which case scanning simply moves on to the next position and
//!            then the next rule.
//!         4. When a builder produces a token, splice it in place of the window and start
//!            over from the top of the table.
//!
//!     Restarting from the top after every reduction is what lets later rules assume earlier
//!     ones have already run (literals become expressions before operators combine them,
//!     operators combine before statements close the line). Every reduction either shortens
//!     the line or moves a single token strictly forward along literal -> expression ->
//!     statement, so the loop always terminates.
//!
//!     A line is well formed when exactly `[indent, statement]` is left.

use tracing::trace;

use crate::photon::ast::{Node, ParseError, SyntaxError};
use crate::photon::token::{phrase, Kind, SourceContext, Token};

/// Builds the replacement token for a matched window, or declines it.
pub type Builder = fn(&Window<'_>) -> Result<Option<Token>, ParseError>;

/// One grammar rule: a fixed kind tuple and its builder.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: &'static [Kind],
    pub build: Builder,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// A matched window, as seen by a builder.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub tokens: &'a [Token],
    pub start: usize,
    pub len: usize,
    pub context: SourceContext<'a>,
}

impl<'a> Window<'a> {
    /// The i-th token of the window.
    pub fn get(&self, i: usize) -> &'a Token {
        &self.tokens[self.start + i]
    }

    pub fn matched(&self) -> &'a [Token] {
        &self.tokens[self.start..self.start + self.len]
    }

    /// The token right before the window, ignoring the indent marker.
    pub fn before(&self) -> Option<&'a Token> {
        if self.start == 0 {
            return None;
        }
        match &self.tokens[self.start - 1] {
            Token::Indent(_) => None,
            token => Some(token),
        }
    }

    /// The token right after the window.
    pub fn after(&self) -> Option<&'a Token> {
        self.tokens.get(self.start + self.len)
    }

    pub fn before_kind(&self) -> Option<Kind> {
        self.before().map(Token::kind)
    }

    pub fn after_kind(&self) -> Option<Kind> {
        self.after().map(Token::kind)
    }

    /// True when the window covers every token of the line but the indent.
    pub fn spans_line(&self) -> bool {
        self.before().is_none() && self.after().is_none()
    }

    pub fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax(SyntaxError {
            message: message.into(),
            file: self.context.file.to_string(),
            line_number: self.context.line_number,
            line: self.context.line.to_string(),
            phrase: Some(phrase(self.tokens)),
        })
    }

    /// The window does not have the shape its rule promised.
    pub fn mismatch(&self, rule: &str) -> ParseError {
        ParseError::Internal(format!(
            "rule `{}` received `{}`",
            rule,
            phrase(self.matched())
        ))
    }
}

/// Runs a rule table to a fixed point.
#[derive(Debug, Clone, Copy)]
pub struct Reducer<'g> {
    rules: &'g [Rule],
}

impl<'g> Reducer<'g> {
    pub fn new(rules: &'g [Rule]) -> Self {
        Self { rules }
    }

    /// Reduce until no rule applies and return what is left.
    pub fn reduce_tokens(
        &self,
        mut tokens: Vec<Token>,
        context: SourceContext<'_>,
    ) -> Result<Vec<Token>, ParseError> {
        let offset = usize::from(matches!(tokens.first(), Some(Token::Indent(_))));

        'reduce: loop {
            let kinds: Vec<Kind> = tokens[offset..].iter().map(Token::kind).collect();
            for rule in self.rules {
                let n = rule.pattern.len();
                if n == 0 || n > kinds.len() {
                    continue;
                }
                for pos in 0..=kinds.len() - n {
                    if kinds[pos..pos + n] != *rule.pattern {
                        continue;
                    }
                    let start = pos + offset;
                    let window = Window {
                        tokens: &tokens,
                        start,
                        len: n,
                        context,
                    };
                    if let Some(token) = (rule.build)(&window)? {
                        trace!(rule = rule.name, start, "reduced window");
                        tokens.splice(start..start + n, std::iter::once(token));
                        continue 'reduce;
                    }
                }
            }
            return Ok(tokens);
        }
    }

    /// Reduce a tokenized line to its statement.
    pub fn reduce(&self, tokens: Vec<Token>, context: SourceContext<'_>) -> Result<Node, ParseError> {
        let mut reduced = self.reduce_tokens(tokens, context)?;
        if matches!(
            reduced.as_slice(),
            [Token::Indent(_), Token::Statement(_)]
        ) {
            if let Some(Token::Statement(node)) = reduced.pop() {
                return Ok(node);
            }
        }
        let message = if reduced.len() <= 1 {
            "expected a statement"
        } else {
            "could not reduce line to a statement (common causes: missing ',', ')', ']' or '}')"
        };
        Err(ParseError::Syntax(SyntaxError {
            message: message.to_string(),
            file: context.file.to_string(),
            line_number: context.line_number,
            line: context.line.to_string(),
            phrase: Some(phrase(&reduced)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::ast::{Comment, Expr};

    fn context() -> SourceContext<'static> {
        SourceContext::new("test.w", 1, "a b")
    }

    fn first(window: &Window<'_>) -> Result<Option<Token>, ParseError> {
        Ok(Some(Token::Statement(Node::Comment(Comment {
            text: format!("first@{}", window.start),
        }))))
    }

    fn second(_: &Window<'_>) -> Result<Option<Token>, ParseError> {
        Ok(Some(Token::Statement(Node::Comment(Comment {
            text: "second".to_string(),
        }))))
    }

    fn decline(_: &Window<'_>) -> Result<Option<Token>, ParseError> {
        Ok(None)
    }

    fn to_expr(window: &Window<'_>) -> Result<Option<Token>, ParseError> {
        match window.get(0) {
            Token::Var { name, .. } => Ok(Some(Token::Expr(Expr::var(name.clone())))),
            _ => Err(window.mismatch("to_expr")),
        }
    }

    fn line() -> Vec<Token> {
        vec![Token::Indent(0), Token::var("a"), Token::var("b")]
    }

    fn comment_text(node: Node) -> String {
        match node {
            Node::Comment(c) => c.text,
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn test_earlier_rule_wins_on_same_window() {
        let rules = [
            Rule {
                name: "first",
                pattern: &[Kind::Var, Kind::Var],
                build: first,
            },
            Rule {
                name: "second",
                pattern: &[Kind::Var, Kind::Var],
                build: second,
            },
        ];
        let node = Reducer::new(&rules).reduce(line(), context()).unwrap();
        assert_eq!(comment_text(node), "first@1");
    }

    #[test]
    fn test_declined_match_falls_through() {
        let rules = [
            Rule {
                name: "decline",
                pattern: &[Kind::Var, Kind::Var],
                build: decline,
            },
            Rule {
                name: "second",
                pattern: &[Kind::Var, Kind::Var],
                build: second,
            },
        ];
        let node = Reducer::new(&rules).reduce(line(), context()).unwrap();
        assert_eq!(comment_text(node), "second");
    }

    #[test]
    fn test_restarts_from_table_top() {
        // `to_expr` is listed last but must run before `pair` can match.
        let rules = [
            Rule {
                name: "pair",
                pattern: &[Kind::Expr, Kind::Expr],
                build: second,
            },
            Rule {
                name: "to_expr",
                pattern: &[Kind::Var],
                build: to_expr,
            },
        ];
        let node = Reducer::new(&rules).reduce(line(), context()).unwrap();
        assert_eq!(comment_text(node), "second");
    }

    #[test]
    fn test_leftover_tokens_are_a_syntax_error() {
        let rules = [Rule {
            name: "to_expr",
            pattern: &[Kind::Var],
            build: to_expr,
        }];
        let err = Reducer::new(&rules).reduce(line(), context()).unwrap_err();
        let err = err.as_syntax().unwrap();
        assert_eq!(err.file, "test.w");
        assert_eq!(err.line, "a b");
        assert_eq!(err.phrase.as_deref(), Some("a b"));
    }
}
