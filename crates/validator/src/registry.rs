//! Rule registry for managing rule descriptors
//!
//! Descriptors are keyed by id and kept in registration order. Lookup runs
//! every descriptor's pattern against a directive and returns all matches,
//! since several rules may share a directive namespace.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use crate::context::RuleContext;
use crate::error::RuleError;
use crate::path::FieldPath;

// ============================================================================
// RULE
// ============================================================================

/// A rule evaluator: checks one field against one directive.
///
/// Implemented for every `Fn(&RuleContext<'_>, &FieldPath<'_>) -> Result<(), RuleError>`
/// closure that is `Send + Sync`.
///
/// # Examples
///
/// ```rust
/// use ruletag::{FieldPath, Rule, RuleContext, RuleError};
///
/// struct Uppercase;
///
/// impl Rule for Uppercase {
///     fn evaluate(&self, _ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
///         let text = field.value().and_then(|value| value.as_text()).unwrap_or_default();
///         if text.chars().all(char::is_uppercase) {
///             Ok(())
///         } else {
///             Err(RuleError::new("uppercase", "must be uppercase"))
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Evaluates the rule against a field.
    fn evaluate(&self, ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError>;
}

impl<F> Rule for F
where
    F: Fn(&RuleContext<'_>, &FieldPath<'_>) -> Result<(), RuleError> + Send + Sync,
{
    fn evaluate(&self, ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
        self(ctx, field)
    }
}

// ============================================================================
// DESCRIPTOR
// ============================================================================

/// A registered rule: id, directive pattern, evaluator and absence behavior.
#[derive(Clone)]
pub struct RuleDescriptor {
    id: String,
    pattern: Regex,
    rule: Arc<dyn Rule>,
    fails_on_absence: bool,
}

impl RuleDescriptor {
    /// Creates a descriptor, compiling `pattern`.
    ///
    /// The pattern is matched unanchored against each directive.
    pub fn new(
        id: impl Into<String>,
        pattern: &str,
        rule: impl Rule + 'static,
    ) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(id, Regex::new(pattern)?, rule))
    }

    /// Creates a descriptor from an already compiled pattern.
    pub fn from_regex(id: impl Into<String>, pattern: Regex, rule: impl Rule + 'static) -> Self {
        Self {
            id: id.into(),
            pattern,
            rule: Arc::new(rule),
            fails_on_absence: false,
        }
    }

    /// Marks the rule as failing when its field is behind an absent ancestor.
    #[must_use = "builder methods must be chained or built"]
    pub fn fail_on_absence(mut self) -> Self {
        self.fails_on_absence = true;
        self
    }

    /// Registry key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Directive pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Whether the rule fails on fields behind an absent ancestor.
    pub fn fails_on_absence(&self) -> bool {
        self.fails_on_absence
    }

    /// True if the pattern matches the directive.
    pub fn matches(&self, directive: &str) -> bool {
        self.pattern.is_match(directive)
    }

    /// Runs the evaluator.
    pub fn evaluate(&self, ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
        self.rule.evaluate(ctx, field)
    }
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("pattern", &self.pattern.as_str())
            .field("fails_on_absence", &self.fails_on_absence)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry of rule descriptors, in registration order.
///
/// The lock is held for a single insert or lookup only.
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<IndexMap<String, Arc<RuleDescriptor>>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor, replacing any descriptor with the same id.
    ///
    /// A replaced descriptor keeps its original position.
    pub fn register(&self, descriptor: RuleDescriptor) {
        let id = descriptor.id.clone();
        let replaced = self
            .rules
            .write()
            .insert(id.clone(), Arc::new(descriptor))
            .is_some();
        debug!(rule = %id, replaced, "Registered rule");
    }

    /// Removes a descriptor by id, returning it.
    pub fn unregister(&self, id: &str) -> Option<Arc<RuleDescriptor>> {
        let removed = self.rules.write().shift_remove(id);
        if removed.is_some() {
            debug!(rule = %id, "Unregistered rule");
        }
        removed
    }

    /// Every descriptor whose pattern matches the directive, in registration order.
    pub fn matching(&self, directive: &str) -> Vec<Arc<RuleDescriptor>> {
        self.rules
            .read()
            .values()
            .filter(|descriptor| descriptor.matches(directive))
            .cloned()
            .collect()
    }

    /// Looks up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<Arc<RuleDescriptor>> {
        self.rules.read().get(id).cloned()
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.rules.read().keys().cloned().collect()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.ids())
            .finish()
    }
}
