//! Record traversal
//!
//! A walk starts at a record and visits its fields in declaration order,
//! evaluating each field's rule text and descending into nested records.
//! The first failure ends the walk.
//!
//! When a field's pointer chain ends in an absent link, there is no value to
//! evaluate rules against. The walk then switches to the declared shape of
//! the record the field would have held and only checks whether any rule on
//! a field below it fails on absence.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::{self, ParseCache};
use crate::context::Context;
use crate::directive::{Evaluator, Expr};
use crate::error::{ValidationError, ValidationResult};
use crate::path::FieldPath;
use crate::registry::RuleRegistry;
use crate::value::{Inspect, Kind, Shape};

/// One validation walk.
pub(crate) struct Walker<'a> {
    registry: &'a RuleRegistry,
    ctx: &'a Context,
    cache: Option<&'a ParseCache>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        registry: &'a RuleRegistry,
        ctx: &'a Context,
        cache: Option<&'a ParseCache>,
    ) -> Self {
        Self {
            registry,
            ctx,
            cache,
        }
    }

    /// Validates a top-level value, which must be a record directly or
    /// through a pointer chain.
    pub(crate) fn validate_root(&self, root: &dyn Inspect) -> ValidationResult<()> {
        match follow(root) {
            Ok(value) if value.kind() == Kind::Record => self.walk_record(value, None),
            Ok(value) => Err(unsupported(value.kind(), value.shape())),
            Err(absent) => {
                let declared = absent.shape();
                match declared.resolve() {
                    Some(record) if record.kind() == Kind::Record => {
                        debug!(type_name = record.type_name(), "Top-level value is absent");
                        self.walk_absent(record, None, &mut Vec::new())
                    }
                    Some(other) => Err(unsupported(other.kind(), other)),
                    None => Err(unsupported(declared.kind(), declared)),
                }
            }
        }
    }

    /// Evaluates rule text against a single value, outside of any record.
    pub(crate) fn validate_value(&self, rules: &str, value: &dyn Inspect) -> ValidationResult<()> {
        self.check_rules(&FieldPath::detached(rules, value))
    }

    fn walk_record(&self, record: &dyn Inspect, parent: Option<&FieldPath<'_>>) -> ValidationResult<()> {
        for field in record.fields() {
            let node = FieldPath::new(field.name(), field.rules(), field.value(), parent);
            trace!(field = %node, kind = %field.value().kind(), "Visiting field");
            self.check_rules(&node)?;

            match follow(field.value()) {
                Ok(value) if value.kind() == Kind::Record => {
                    self.walk_record(value, Some(&node))?;
                }
                Ok(_) => {}
                Err(absent) => {
                    if let Some(record) = record_shape(absent.shape()) {
                        self.walk_absent(record, Some(&node), &mut Vec::new())?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Absence mode over a declared record.
    ///
    /// `visited` holds the record types on the current absence path.
    fn walk_absent(
        &self,
        record: Shape,
        parent: Option<&FieldPath<'_>>,
        visited: &mut Vec<&'static str>,
    ) -> ValidationResult<()> {
        if visited.contains(&record.type_name()) {
            return Ok(());
        }
        visited.push(record.type_name());

        for decl in record.fields() {
            let node = FieldPath::unreachable(decl.name(), decl.rules(), parent);
            trace!(field = %node, "Checking unreachable field");
            self.check_absence(&node)?;

            if let Some(nested) = record_shape(decl.shape()) {
                self.walk_absent(nested, Some(&node), visited)?;
            }
        }

        visited.pop();
        Ok(())
    }

    /// Runs a field's rule text through the expression engine.
    fn check_rules(&self, node: &FieldPath<'_>) -> ValidationResult<()> {
        let Some(expr) = self.parse(node)? else {
            return Ok(());
        };

        Evaluator::new(self.registry, self.ctx)
            .eval(&expr, node)
            .map_err(|failure| {
                debug!(field = %node, rule = %failure.rule, "Validation failed");
                ValidationError::RuleFailed {
                    rule: failure.rule,
                    field: node.full_name(),
                    source: failure.error,
                }
            })
    }

    /// Fails if any directive of an unreachable field matches a rule that
    /// fails on absence.
    fn check_absence(&self, node: &FieldPath<'_>) -> ValidationResult<()> {
        let Some(expr) = self.parse(node)? else {
            return Ok(());
        };

        for directive in expr.directives() {
            let failing = self
                .registry
                .matching(directive)
                .into_iter()
                .find(|descriptor| descriptor.fails_on_absence());

            if let Some(descriptor) = failing {
                debug!(field = %node, rule = descriptor.id(), "Unreachable field failed");
                return Err(ValidationError::Unreachable {
                    rule: descriptor.id().to_owned(),
                    field: node.full_name(),
                });
            }
        }
        Ok(())
    }

    fn parse(&self, node: &FieldPath<'_>) -> ValidationResult<Option<Arc<Expr>>> {
        cache::parse(self.cache, node.rules()).map_err(|source| ValidationError::Syntax {
            field: node.full_name(),
            source,
        })
    }
}

/// Follows a pointer chain to a non-pointer value, or to the absent link.
fn follow(value: &dyn Inspect) -> Result<&dyn Inspect, &dyn Inspect> {
    let mut current = value;
    while current.kind().is_pointer() {
        if current.is_absent() {
            return Err(current);
        }
        current = current.pointee().ok_or(current)?;
    }
    Ok(current)
}

/// The record a declared shape holds, directly or through pointers.
fn record_shape(shape: Shape) -> Option<Shape> {
    shape.resolve().filter(|shape| shape.kind() == Kind::Record)
}

fn unsupported(kind: Kind, shape: Shape) -> ValidationError {
    ValidationError::Unsupported {
        kind,
        type_name: shape.type_name(),
    }
}
