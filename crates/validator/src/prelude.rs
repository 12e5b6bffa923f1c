//! Prelude module for convenient imports.
//!
//! ```rust
//! use ruletag::prelude::*;
//!
//! let validator = Validator::new();
//! assert!(validator.validate_rules(&Context::background(), "len(3)", &"abc").is_ok());
//! ```

pub use crate::{
    Context, Describe, FieldPath, Inspect, Kind, Rule, RuleContext, RuleDescriptor, RuleError,
    ValidationError, ValidationResult, Validator, ValidatorConfig,
};

#[cfg(feature = "derive")]
pub use crate::Record;
