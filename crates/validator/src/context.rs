//! Ambient validation context with cancellation and deadline support

use std::collections::HashMap;
use std::time::{Duration, Instant};

use regex::{Captures, Regex};
use tokio_util::sync::CancellationToken;

/// Context for a validation call.
///
/// Carries cancellation, an optional deadline and arbitrary metadata. The
/// validator never inspects it; it is handed unchanged to every rule
/// evaluator so that rules doing I/O can give up early.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Cooperative cancellation token.
    pub cancellation: CancellationToken,
    /// Point in time after which evaluators should stop working.
    pub deadline: Option<Instant>,
    /// Arbitrary key-value pairs for custom evaluators.
    pub metadata: HashMap<String, String>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Replace the default cancellation token with the provided one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Add a key-value metadata pair to the context.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// True once the cancellation token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// The deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// What a rule evaluator sees besides the field: the directive it was
/// dispatched for and the caller's [`Context`].
///
/// One rule text may hold several directives, so evaluators read their
/// parameters from [`directive`](RuleContext::directive) rather than from
/// the field's full rule text.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    directive: &'a str,
    rule_id: &'a str,
    ambient: &'a Context,
}

impl<'a> RuleContext<'a> {
    /// Creates a rule context.
    pub fn new(directive: &'a str, rule_id: &'a str, ambient: &'a Context) -> Self {
        Self {
            directive,
            rule_id,
            ambient,
        }
    }

    /// The exact directive text this evaluation was dispatched for.
    pub fn directive(&self) -> &'a str {
        self.directive
    }

    /// Id of the descriptor being evaluated.
    pub fn rule_id(&self) -> &'a str {
        self.rule_id
    }

    /// The caller's context.
    pub fn ambient(&self) -> &'a Context {
        self.ambient
    }

    /// Runs `pattern` against the directive and returns its capture groups.
    pub fn captures(&self, pattern: &Regex) -> Option<Captures<'a>> {
        pattern.captures(self.directive)
    }
}
