//! Error types for rule evaluation and record validation
//!
//! Three layers:
//!
//! - [`RuleError`]: what a rule evaluator reports about one value.
//! - [`SyntaxError`]: malformed rule text, found before anything is evaluated.
//! - [`ValidationError`]: what [`Validator::validate`](crate::Validator::validate)
//!   returns: the first failure of a walk, tagged with the field path.
//!
//! All string fields of [`RuleError`] use `Cow<'static, str>` so the common case
//! of static codes and messages does not allocate.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::value::Kind;

// ============================================================================
// RULE ERROR
// ============================================================================

/// A structured error reported by a rule evaluator.
///
/// # Examples
///
/// ```rust
/// use ruletag::RuleError;
///
/// let error = RuleError::new("len", "length mismatch")
///     .with_param("expected", "13")
///     .with_param("actual", "4");
///
/// assert_eq!(error.param("expected"), Some("13"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    /// Error code for programmatic handling.
    ///
    /// Examples: "email", "len", "not_failed", "or_failed"
    pub code: Cow<'static, str>,

    /// Human-readable error message in English.
    pub message: Cow<'static, str>,

    /// Ordered key-value parameters (typically 0-3).
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,

    /// Errors of sub-expressions, e.g. both sides of a failed `||`.
    pub nested: Vec<RuleError>,

    /// Optional help text or suggestion for fixing the error.
    pub help: Option<Cow<'static, str>>,
}

impl RuleError {
    /// Creates a new rule error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: Vec::new(),
            nested: Vec::new(),
            help: None,
        }
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Replaces the nested errors.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested(mut self, errors: Vec<RuleError>) -> Self {
        self.nested = errors;
        self
    }

    /// Adds help text or a suggestion.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_help(mut self, help: impl Into<Cow<'static, str>>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Returns true if this error has nested errors.
    #[must_use]
    pub fn has_nested(&self) -> bool {
        !self.nested.is_empty()
    }

    /// Flattens all errors into a single list (depth-first).
    #[must_use]
    pub fn flatten(&self) -> Vec<&RuleError> {
        let mut result = vec![self];
        for nested in &self.nested {
            result.extend(nested.flatten());
        }
        result
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;

        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, ")")?;
        }

        if !self.nested.is_empty() {
            write!(f, " [")?;
            for (i, nested) in self.nested.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{nested}")?;
            }
            write!(f, "]")?;
        }

        if let Some(help) = &self.help {
            write!(f, " (help: {help})")?;
        }

        Ok(())
    }
}

impl std::error::Error for RuleError {}

impl From<ValueError> for RuleError {
    fn from(error: ValueError) -> Self {
        match error {
            ValueError::NotMeasurable { kind } => RuleError::new("not_measurable", error.to_string())
                .with_param("kind", kind.name()),
            ValueError::Absent => RuleError::new("absent", error.to_string()),
        }
    }
}

// ============================================================================
// VALUE ERROR
// ============================================================================

/// Misuse of the value view, as opposed to a value failing a rule.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// `length()` was called on a kind that has no length.
    #[error("value of kind {kind} has no length")]
    NotMeasurable { kind: Kind },

    /// The value is an absent optional, reference or any.
    #[error("value is absent")]
    Absent,
}

// ============================================================================
// SYNTAX ERROR
// ============================================================================

/// What exactly is wrong with a piece of rule text.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `)` without an opening `(`, or a `(` that is never closed.
    UnbalancedParentheses,
    /// An operand, group, condition or branch with no content.
    EmptyExpression,
    /// `if(...)` or `elif(...)` not followed by `then(...)`.
    MissingThen,
    /// `then(...)` followed by something other than `&&`, `||`, `elif` or `else`.
    UnexpectedAfterThen,
    /// Anything after the closing parenthesis of `else(...)`.
    UnexpectedAfterElse,
    /// Text after the closing parenthesis of a group.
    TrailingInput,
    /// `&&` or `||` with nothing on one of its sides.
    DanglingOperator,
    /// Negations, groups and conditionals nested deeper than
    /// [`MAX_NESTING_DEPTH`](crate::directive::MAX_NESTING_DEPTH).
    TooDeep,
}

impl SyntaxErrorKind {
    /// A short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::UnbalancedParentheses => "unbalanced parentheses",
            Self::EmptyExpression => "empty expression",
            Self::MissingThen => "`if`/`elif` without `then`",
            Self::UnexpectedAfterThen => "`then` must be followed by `&&`, `||`, `elif` or `else`",
            Self::UnexpectedAfterElse => "unexpected input after `else`",
            Self::TrailingInput => "unexpected input after closing parenthesis",
            Self::DanglingOperator => "operator is missing an operand",
            Self::TooDeep => "expression is nested too deeply",
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Malformed rule text.
///
/// `position` is a byte offset into the whitespace-stripped rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {position} in rule `{rule}`")]
pub struct SyntaxError {
    /// The whitespace-stripped rule text.
    pub rule: String,
    /// Byte offset of the offending token.
    pub position: usize,
    /// What went wrong.
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub(crate) fn new(rule: &str, position: usize, kind: SyntaxErrorKind) -> Self {
        Self {
            rule: rule.to_owned(),
            position,
            kind,
        }
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// The first failure of a validation walk.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The rule text of a field is malformed.
    #[error("syntax error on field `{field}`: {source}")]
    Syntax {
        field: String,
        #[source]
        source: SyntaxError,
    },

    /// A rule evaluator rejected the field's value.
    #[error("rule `{rule}` failed on field `{field}`: {source}")]
    RuleFailed {
        rule: String,
        field: String,
        #[source]
        source: RuleError,
    },

    /// A rule that fails on absence is attached to a field behind an absent ancestor.
    #[error("rule `{rule}` failed on field `{field}`: field is unreachable because an ancestor is absent")]
    Unreachable { rule: String, field: String },

    /// The top-level value is not a record, directly or through a reference.
    #[error("validation of kind {kind} is not supported (type `{type_name}`)")]
    Unsupported { kind: Kind, type_name: &'static str },
}

impl ValidationError {
    /// Get error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "RULE:SYNTAX",
            Self::RuleFailed { .. } => "RULE:FAILED",
            Self::Unreachable { .. } => "RULE:UNREACHABLE",
            Self::Unsupported { .. } => "RULE:UNSUPPORTED",
        }
    }

    /// Full dotted path of the failing field, if the failure belongs to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Syntax { field, .. }
            | Self::RuleFailed { field, .. }
            | Self::Unreachable { field, .. } => Some(field),
            Self::Unsupported { .. } => None,
        }
    }

    /// The rule (descriptor id or expression) that failed, if any.
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::RuleFailed { rule, .. } | Self::Unreachable { rule, .. } => Some(rule),
            Self::Syntax { .. } | Self::Unsupported { .. } => None,
        }
    }

    /// True for malformed rule text.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// True when the caller handed over something that cannot be validated.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// True when the data itself failed a rule (reachable or not).
    pub fn is_rule_failure(&self) -> bool {
        matches!(self, Self::RuleFailed { .. } | Self::Unreachable { .. })
    }
}

/// A validation result using [`ValidationError`].
pub type ValidationResult<T> = Result<T, ValidationError>;
