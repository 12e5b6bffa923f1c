//! AST evaluation against a field
//!
//! An atomic directive runs every registered rule whose pattern matches it
//! and fails on the first rule that fails. A directive that matches nothing
//! succeeds.

use std::fmt;

use tracing::trace;

use super::ast::{Expr, LogicalOp, MAX_NESTING_DEPTH};
use crate::context::{Context, RuleContext};
use crate::error::RuleError;
use crate::path::FieldPath;
use crate::registry::RuleRegistry;

/// Why an expression did not hold for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Descriptor id for atomic failures, the rendered sub-expression otherwise.
    pub rule: String,
    /// What went wrong.
    pub error: RuleError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule `{}` failed: {}", self.rule, self.error)
    }
}

impl std::error::Error for Failure {}

/// Evaluator for rule expression ASTs
pub struct Evaluator<'a> {
    registry: &'a RuleRegistry,
    ctx: &'a Context,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator over a registry and caller context
    pub fn new(registry: &'a RuleRegistry, ctx: &'a Context) -> Self {
        Self { registry, ctx }
    }

    /// Evaluate an expression against a field
    pub fn eval(&self, expr: &Expr, field: &FieldPath<'_>) -> Result<(), Failure> {
        self.eval_with_depth(expr, field, 0)
    }

    /// Evaluate an expression with nesting depth tracking
    fn eval_with_depth(
        &self,
        expr: &Expr,
        field: &FieldPath<'_>,
        depth: usize,
    ) -> Result<(), Failure> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Failure {
                rule: "max_depth".to_owned(),
                error: RuleError::new(
                    "max_depth",
                    format!("maximum nesting depth ({MAX_NESTING_DEPTH}) exceeded"),
                ),
            });
        }

        match expr {
            Expr::Atomic(directive) => self.eval_atomic(directive, field),

            Expr::Not(inner) => match self.eval_with_depth(inner, field, depth + 1) {
                Ok(()) => Err(Failure {
                    rule: expr.to_string(),
                    error: RuleError::new("not_failed", "validation should have failed but passed")
                        .with_param("expression", inner.to_string()),
                }),
                Err(_) => Ok(()),
            },

            Expr::Group(inner) => self.eval_with_depth(inner, field, depth + 1),

            Expr::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    if self.eval_with_depth(&branch.condition, field, depth + 1).is_ok() {
                        return self.eval_with_depth(&branch.then, field, depth + 1);
                    }
                }
                match otherwise {
                    Some(otherwise) => self.eval_with_depth(otherwise, field, depth + 1),
                    None => Ok(()),
                }
            }

            Expr::Binary { .. } => self.eval_chain(expr, field, depth),
        }
    }

    /// Walk the right spine of a chain in a loop.
    ///
    /// An `||` whose left side failed waits in `pending` until the rest of
    /// the chain has an outcome; if that fails too, both errors are nested.
    fn eval_chain(&self, chain: &Expr, field: &FieldPath<'_>, depth: usize) -> Result<(), Failure> {
        let mut pending = Vec::new();
        let mut node = chain;

        let mut outcome = loop {
            let Expr::Binary { left, op, right } = node else {
                break self.eval_with_depth(node, field, depth);
            };
            let left_depth = if matches!(**left, Expr::Binary { .. }) {
                depth + 1
            } else {
                depth
            };
            match (*op, self.eval_with_depth(left, field, left_depth)) {
                (LogicalOp::And, Ok(())) => {}
                (LogicalOp::And, Err(failure)) => break Err(failure),
                (LogicalOp::Or, Ok(())) => break Ok(()),
                (LogicalOp::Or, Err(failure)) => pending.push((node, failure)),
            }
            node = right;
        };

        while let Some((or, left_failure)) = pending.pop() {
            outcome = outcome.map_err(|right_failure| Failure {
                rule: or.to_string(),
                error: RuleError::new("or_failed", "no alternative passed")
                    .with_nested(vec![left_failure.error, right_failure.error]),
            });
        }
        outcome
    }

    fn eval_atomic(&self, directive: &str, field: &FieldPath<'_>) -> Result<(), Failure> {
        for descriptor in self.registry.matching(directive) {
            trace!(directive, rule = descriptor.id(), field = %field, "Dispatching directive");
            let ctx = RuleContext::new(directive, descriptor.id(), self.ctx);
            descriptor.evaluate(&ctx, field).map_err(|error| Failure {
                rule: descriptor.id().to_owned(),
                error,
            })?;
        }
        Ok(())
    }
}
