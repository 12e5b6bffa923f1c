//! Abstract Syntax Tree (AST) node types
//!
//! This module defines the AST structure for parsed rule text.

use std::fmt;
use std::sync::Arc;

/// Maximum nesting of negations, groups and conditional bodies
pub const MAX_NESTING_DEPTH: usize = 256;

/// A rule expression node in the AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single directive, dispatched to the registry (e.g. `email`, `len(13)`)
    Atomic(Arc<str>),

    /// Logical NOT (!expr)
    Not(Box<Expr>),

    /// Parenthesized expression ((expr))
    Group(Box<Expr>),

    /// Conditional (if(c)then(t) elif(c)then(t)... else(e))
    If {
        /// `if` and `elif` branches, in order.
        branches: Vec<Branch>,
        /// The `else` branch.
        otherwise: Option<Box<Expr>>,
    },

    /// Logical operation (left op right)
    ///
    /// Chains are right-associative with no precedence: `left` is never
    /// itself an ungrouped binary operation.
    Binary {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
}

/// One `if(condition)then(body)` or `elif(condition)then(body)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub condition: Expr,
    pub then: Expr,
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Get a human-readable name for the operator
    pub fn name(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Expr {
    /// Creates an atomic directive.
    pub fn atomic(directive: impl Into<Arc<str>>) -> Self {
        Expr::Atomic(directive.into())
    }

    /// Every atomic directive in the tree, left to right.
    pub fn directives(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_directives(&mut out);
        out
    }

    fn collect_directives<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Atomic(directive) => out.push(directive),
            Expr::Not(inner) | Expr::Group(inner) => inner.collect_directives(out),
            Expr::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    branch.condition.collect_directives(out);
                    branch.then.collect_directives(out);
                }
                if let Some(otherwise) = otherwise {
                    otherwise.collect_directives(out);
                }
            }
            Expr::Binary { .. } => {
                let mut node = self;
                while let Expr::Binary { left, right, .. } = node {
                    left.collect_directives(out);
                    node = right;
                }
                node.collect_directives(out);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Atomic(directive) => f.write_str(directive),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Group(inner) => write!(f, "({inner})"),
            Expr::If {
                branches,
                otherwise,
            } => {
                for (i, branch) in branches.iter().enumerate() {
                    let keyword = if i == 0 { "if" } else { "elif" };
                    write!(f, "{keyword}({})then({})", branch.condition, branch.then)?;
                }
                if let Some(otherwise) = otherwise {
                    write!(f, "else({otherwise})")?;
                }
                Ok(())
            }
            Expr::Binary { .. } => {
                let mut node = self;
                while let Expr::Binary { left, op, right } = node {
                    if matches!(**left, Expr::Binary { .. }) {
                        write!(f, "({left}) {op} ")?;
                    } else {
                        write!(f, "{left} {op} ")?;
                    }
                    node = right;
                }
                write!(f, "{node}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and(left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op: LogicalOp::And,
            right: Box::new(right),
        }
    }

    #[test]
    fn test_display() {
        let expr = and(
            Expr::Not(Box::new(Expr::atomic("email"))),
            Expr::Group(Box::new(Expr::atomic("len(13)"))),
        );
        assert_eq!(expr.to_string(), "!email && (len(13))");
    }

    #[test]
    fn test_display_groups_nested_left_operand() {
        let expr = and(and(Expr::atomic("a"), Expr::atomic("b")), Expr::atomic("c"));
        assert_eq!(expr.to_string(), "(a && b) && c");
    }

    #[test]
    fn test_long_chain_display_and_directives() {
        let expr = (0..2_000).fold(Expr::atomic("last"), |right, _| {
            and(Expr::atomic("email"), right)
        });
        assert_eq!(expr.directives().len(), 2_001);
        assert!(expr.to_string().ends_with("email && last"));
    }

    #[test]
    fn test_display_conditional() {
        let expr = Expr::If {
            branches: vec![
                Branch {
                    condition: Expr::atomic("len(13)"),
                    then: Expr::atomic("email"),
                },
                Branch {
                    condition: Expr::atomic("len(4)"),
                    then: Expr::Not(Box::new(Expr::atomic("email"))),
                },
            ],
            otherwise: Some(Box::new(Expr::atomic("non-zero"))),
        };
        assert_eq!(
            expr.to_string(),
            "if(len(13))then(email)elif(len(4))then(!email)else(non-zero)"
        );
        assert_eq!(
            expr.directives(),
            ["len(13)", "email", "len(4)", "email", "non-zero"]
        );
    }
}
