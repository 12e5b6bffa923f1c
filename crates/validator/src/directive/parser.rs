//! Parser for converting rule text into an AST
//!
//! Rule text is stripped of all whitespace first; every position reported in
//! a [`SyntaxError`] is a byte offset into the stripped text.
//!
//! `&&` and `||` have no precedence: the text is split at the first operator
//! outside any parentheses, the left side is a single expression and the
//! right side is parsed again as a chain. `a && b || c` is `a && (b || c)`
//! and `a || b && c` is `a || (b && c)`.
//!
//! Chains are parsed with a loop; only negations, groups and conditional
//! bodies recurse, and those are limited to [`MAX_NESTING_DEPTH`] levels.

use std::sync::Arc;

use super::ast::{Branch, Expr, LogicalOp, MAX_NESTING_DEPTH};
use crate::error::{SyntaxError, SyntaxErrorKind};

/// Parses rule text.
///
/// Returns `Ok(None)` for rule text that is empty after whitespace removal.
///
/// # Examples
///
/// ```rust
/// use ruletag::directive::{parse, Expr};
///
/// let expr = parse("required && email").unwrap().unwrap();
/// assert_eq!(expr.directives(), ["required", "email"]);
///
/// assert_eq!(parse("  \t").unwrap(), None);
/// assert!(parse("(email").is_err());
/// ```
pub fn parse(rule: &str) -> Result<Option<Expr>, SyntaxError> {
    let stripped = strip_whitespace(rule);
    if stripped.is_empty() {
        return Ok(None);
    }
    Parser::new(&stripped).parse().map(Some)
}

/// Removes every whitespace character.
pub fn strip_whitespace(rule: &str) -> String {
    rule.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parser over whitespace-stripped rule text
struct Parser<'a> {
    text: &'a str,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn parse(&self) -> Result<Expr, SyntaxError> {
        self.check_balance()?;
        self.parse_chain(0, self.text.len(), 0)
    }

    /// Parse `Expr [("&&" | "||") Chain]` over `start..end`
    fn parse_chain(&self, start: usize, end: usize, depth: usize) -> Result<Expr, SyntaxError> {
        let mut operands = Vec::new();
        let mut cursor = start;

        while let Some((at, op)) = self.find_operator(cursor, end) {
            if at == cursor || at + 2 == end {
                return Err(self.error(at, SyntaxErrorKind::DanglingOperator));
            }
            operands.push((self.parse_expression(cursor, at, depth)?, op));
            cursor = at + 2;
        }

        let last = self.parse_expression(cursor, end, depth)?;
        Ok(operands
            .into_iter()
            .rev()
            .fold(last, |right, (left, op)| Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            }))
    }

    /// Parse a single expression over `start..end`
    fn parse_expression(
        &self,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Expr, SyntaxError> {
        if start >= end {
            return Err(self.error(start, SyntaxErrorKind::EmptyExpression));
        }
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error(start, SyntaxErrorKind::TooDeep));
        }

        let text = &self.text[start..end];
        if text.starts_with('!') {
            let inner = self.parse_expression(start + 1, end, depth + 1)?;
            Ok(Expr::Not(Box::new(inner)))
        } else if text.starts_with("if(") {
            self.parse_conditional(start, end, depth + 1)
        } else if text.starts_with('(') {
            let close = self.matching_paren(start, end)?;
            if close + 1 != end {
                return Err(self.error(close + 1, SyntaxErrorKind::TrailingInput));
            }
            let inner = self.parse_body(start, close, depth + 1)?;
            Ok(Expr::Group(Box::new(inner)))
        } else {
            Ok(Expr::Atomic(Arc::from(text)))
        }
    }

    /// Parse `if(..)then(..) {elif(..)then(..)} [else(..)]` spanning exactly `start..end`
    fn parse_conditional(
        &self,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Expr, SyntaxError> {
        let mut branches = Vec::new();
        // Points at the opening parenthesis of the current condition.
        let mut pos = start + "if".len();

        loop {
            let close = self.matching_paren(pos, end)?;
            let condition = self.parse_body(pos, close, depth)?;
            pos = close + 1;

            if !self.text[pos..end].starts_with("then(") {
                return Err(self.error(pos, SyntaxErrorKind::MissingThen));
            }
            pos += "then".len();
            let close = self.matching_paren(pos, end)?;
            let then = self.parse_body(pos, close, depth)?;
            branches.push(Branch { condition, then });
            pos = close + 1;

            let rest = &self.text[pos..end];
            if rest.is_empty() {
                return Ok(Expr::If {
                    branches,
                    otherwise: None,
                });
            } else if rest.starts_with("elif(") {
                pos += "elif".len();
            } else if rest.starts_with("else(") {
                pos += "else".len();
                let close = self.matching_paren(pos, end)?;
                let otherwise = self.parse_body(pos, close, depth)?;
                if close + 1 != end {
                    return Err(self.error(close + 1, SyntaxErrorKind::UnexpectedAfterElse));
                }
                return Ok(Expr::If {
                    branches,
                    otherwise: Some(Box::new(otherwise)),
                });
            } else {
                return Err(self.error(pos, SyntaxErrorKind::UnexpectedAfterThen));
            }
        }
    }

    /// Parse the chain between the parentheses at `open` and `close`
    fn parse_body(&self, open: usize, close: usize, depth: usize) -> Result<Expr, SyntaxError> {
        if open + 1 == close {
            return Err(self.error(open + 1, SyntaxErrorKind::EmptyExpression));
        }
        self.parse_chain(open + 1, close, depth)
    }

    /// First `&&` or `||` at parenthesis depth zero within `start..end`
    fn find_operator(&self, start: usize, end: usize) -> Option<(usize, LogicalOp)> {
        let bytes = self.text.as_bytes();
        let mut depth = 0_usize;
        let mut i = start;

        while i < end {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b'&' if depth == 0 && bytes.get(i + 1) == Some(&b'&') && i + 1 < end => {
                    return Some((i, LogicalOp::And));
                }
                b'|' if depth == 0 && bytes.get(i + 1) == Some(&b'|') && i + 1 < end => {
                    return Some((i, LogicalOp::Or));
                }
                _ => {}
            }
            i += 1;
        }

        None
    }

    /// Position of the parenthesis closing the one at `open`
    fn matching_paren(&self, open: usize, end: usize) -> Result<usize, SyntaxError> {
        let bytes = self.text.as_bytes();
        let mut depth = 0_usize;

        for (i, byte) in bytes.iter().enumerate().take(end).skip(open) {
            match byte {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
        }

        Err(self.error(open, SyntaxErrorKind::UnbalancedParentheses))
    }

    /// Reject any `)` without an opening `(` and any `(` never closed
    fn check_balance(&self) -> Result<(), SyntaxError> {
        let mut open = Vec::new();

        for (i, byte) in self.text.bytes().enumerate() {
            match byte {
                b'(' => open.push(i),
                b')' => {
                    if open.pop().is_none() {
                        return Err(self.error(i, SyntaxErrorKind::UnbalancedParentheses));
                    }
                }
                _ => {}
            }
        }

        match open.first() {
            Some(&position) => Err(self.error(position, SyntaxErrorKind::UnbalancedParentheses)),
            None => Ok(()),
        }
    }

    fn error(&self, position: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.text, position, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(input: &str) -> Expr {
        parse(input).unwrap().unwrap()
    }

    fn parse_err(input: &str) -> SyntaxError {
        parse(input).unwrap_err()
    }

    fn atomic(directive: &str) -> Expr {
        Expr::atomic(directive)
    }

    fn binary(left: Expr, op: LogicalOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[test]
    fn test_parse_atomic() {
        assert_eq!(parse_ok("len(13)"), atomic("len(13)"));
        assert_eq!(parse_ok("  email\t"), atomic("email"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse(" \t\n").unwrap(), None);
    }

    #[test]
    fn test_parse_right_associative() {
        assert_eq!(
            parse_ok("a && b || c"),
            binary(
                atomic("a"),
                LogicalOp::And,
                binary(atomic("b"), LogicalOp::Or, atomic("c"))
            )
        );
        assert_eq!(
            parse_ok("a || b && c"),
            binary(
                atomic("a"),
                LogicalOp::Or,
                binary(atomic("b"), LogicalOp::And, atomic("c"))
            )
        );
    }

    #[test]
    fn test_parse_not_binds_to_one_expression() {
        assert_eq!(
            parse_ok("!a && b"),
            binary(Expr::Not(Box::new(atomic("a"))), LogicalOp::And, atomic("b"))
        );
        assert_eq!(
            parse_ok("!!a"),
            Expr::Not(Box::new(Expr::Not(Box::new(atomic("a")))))
        );
    }

    #[test]
    fn test_parse_group() {
        assert_eq!(
            parse_ok("(len(13) && email) && non-nil"),
            binary(
                Expr::Group(Box::new(binary(
                    atomic("len(13)"),
                    LogicalOp::And,
                    atomic("email")
                ))),
                LogicalOp::And,
                atomic("non-nil")
            )
        );
    }

    #[test]
    fn test_parse_conditional() {
        let expr = parse_ok("if(len(13))then(email)elif(len(4))then(!email)else(!non-zero)");
        let Expr::If {
            branches,
            otherwise,
        } = expr
        else {
            panic!("expected conditional");
        };
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].condition, atomic("len(13)"));
        assert_eq!(branches[1].then, Expr::Not(Box::new(atomic("email"))));
        assert_eq!(
            otherwise,
            Some(Box::new(Expr::Not(Box::new(atomic("non-zero")))))
        );
    }

    #[test]
    fn test_parse_conditional_is_one_operand() {
        assert_eq!(
            parse_ok("if(a && b)then(c || d) && e"),
            binary(
                Expr::If {
                    branches: vec![Branch {
                        condition: binary(atomic("a"), LogicalOp::And, atomic("b")),
                        then: binary(atomic("c"), LogicalOp::Or, atomic("d")),
                    }],
                    otherwise: None,
                },
                LogicalOp::And,
                atomic("e")
            )
        );
    }

    #[test]
    fn test_atomic_named_like_keyword() {
        assert_eq!(parse_ok("iffy"), atomic("iffy"));
        assert_eq!(parse_ok("then"), atomic("then"));
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            ("(email", SyntaxErrorKind::UnbalancedParentheses, 0),
            ("email)", SyntaxErrorKind::UnbalancedParentheses, 5),
            ("len(13", SyntaxErrorKind::UnbalancedParentheses, 3),
            ("if(email)", SyntaxErrorKind::MissingThen, 9),
            ("if(email)len(13)", SyntaxErrorKind::MissingThen, 9),
            ("if(email)then(len(13))x", SyntaxErrorKind::UnexpectedAfterThen, 22),
            ("if(a)then(b)else(c)d", SyntaxErrorKind::UnexpectedAfterElse, 19),
            ("(a)b", SyntaxErrorKind::TrailingInput, 3),
            ("email &&", SyntaxErrorKind::DanglingOperator, 5),
            ("|| email", SyntaxErrorKind::DanglingOperator, 0),
            ("a && || b", SyntaxErrorKind::DanglingOperator, 3),
            ("!", SyntaxErrorKind::EmptyExpression, 1),
            ("()", SyntaxErrorKind::EmptyExpression, 1),
            ("if()then(a)", SyntaxErrorKind::EmptyExpression, 3),
        ];

        for (input, kind, position) in cases {
            let error = parse_err(input);
            assert_eq!((error.kind, error.position), (kind, position), "input: {input}");
        }
    }

    #[test]
    fn test_parse_long_chain() {
        let rule = vec!["a"; 1_000].join(" && ");
        let expr = parse_ok(&rule);
        assert_eq!(expr.directives().len(), 1_000);
        assert!(matches!(expr, Expr::Binary { op: LogicalOp::And, .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!(
            "{}a{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert!(parse(&at_limit).is_ok());

        let groups = format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000));
        assert_eq!(parse_err(&groups).kind, SyntaxErrorKind::TooDeep);

        let negations = format!("{}a", "!".repeat(5_000));
        let error = parse_err(&negations);
        assert_eq!(error.kind, SyntaxErrorKind::TooDeep);
        assert_eq!(error.position, MAX_NESTING_DEPTH + 1);

        let conditionals = format!("{}a{}", "if(a)then(".repeat(1_000), ")".repeat(1_000));
        assert_eq!(parse_err(&conditionals).kind, SyntaxErrorKind::TooDeep);
    }

    #[test]
    fn test_syntax_error_carries_stripped_rule() {
        let error = parse_err(" if (email) ");
        assert_eq!(error.rule, "if(email)");
    }

    #[test]
    fn test_display_round_trip() {
        for input in [
            "a && b || c",
            "!(a || b) && c",
            "if(len(13))then(email)elif(len(4))then(!email)else(!non-zero)",
            "if(email)then(len(13)) && non-zero",
        ] {
            let expr = parse_ok(input);
            assert_eq!(parse_ok(&expr.to_string()), expr, "input: {input}");
        }
    }
}
