//! Built-in rules
//!
//! | id         | directive   | fails on absence |
//! |------------|-------------|------------------|
//! | `non-nil`  | `non-nil`   | yes              |
//! | `non-zero` | `non-zero`  | no               |
//! | `required` | `required`  | yes              |
//! | `email`    | `email`     | yes              |
//! | `len`      | `len(N)`    | yes              |
//!
//! Each rule looks through the field's pointer chain before checking the
//! value it ends in.

mod email;
mod length;
mod presence;

use std::sync::LazyLock;

use regex::Regex;

pub use email::email;
pub use length::len;
pub use presence::{non_nil, non_zero, required};

use crate::error::RuleError;
use crate::path::FieldPath;
use crate::registry::{RuleDescriptor, RuleRegistry};
use crate::value::Inspect;

static NON_NIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new("non-nil").unwrap());
static NON_ZERO_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new("non-zero").unwrap());
static REQUIRED_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new("required").unwrap());
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new("email").unwrap());

/// Descriptors for every built-in rule, in registration order.
pub fn builtin() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor::from_regex("non-nil", NON_NIL_PATTERN.clone(), non_nil).fail_on_absence(),
        RuleDescriptor::from_regex("non-zero", NON_ZERO_PATTERN.clone(), non_zero),
        RuleDescriptor::from_regex("required", REQUIRED_PATTERN.clone(), required)
            .fail_on_absence(),
        RuleDescriptor::from_regex("email", EMAIL_PATTERN.clone(), email).fail_on_absence(),
        RuleDescriptor::from_regex("len", length::PATTERN.clone(), len).fail_on_absence(),
    ]
}

/// Registers every built-in rule.
pub fn register_builtin(registry: &RuleRegistry) {
    for descriptor in builtin() {
        registry.register(descriptor);
    }
}

/// The value at the end of the field's pointer chain.
fn resolved<'a>(field: &FieldPath<'a>, rule: &'static str) -> Result<&'a dyn Inspect, RuleError> {
    field
        .value()
        .and_then(|value| value.resolve())
        .ok_or_else(|| {
            RuleError::new(rule, format!("{rule} field `{field}` is absent"))
                .with_param("field", field.full_name())
        })
}
