//! # ruletag
//!
//! Validates nested records against rule expressions attached to their
//! fields.
//!
//! ## Quick Start
//!
//! ```rust
//! use ruletag::{Context, Record, Validator};
//!
//! #[derive(Record)]
//! struct Account {
//!     #[rule("required && email")]
//!     email: String,
//!     #[rule("!non-zero || len(13)")]
//!     phone: Option<String>,
//! }
//!
//! let validator = Validator::new();
//! let ctx = Context::background();
//!
//! let account = Account {
//!     email: "test@test.com".into(),
//!     phone: None,
//! };
//! assert!(validator.validate(&ctx, &account).is_ok());
//! ```
//!
//! ## Rule Text
//!
//! Rule text combines directives such as `required` or `len(13)` with `!`,
//! `&&`, `||`, parentheses and `if(..)then(..)elif(..)then(..)else(..)`.
//! Operators have no precedence: a chain groups to the right, so
//! `a && b || c` reads as `a && (b || c)`. See [`directive`] for the grammar.
//!
//! ## Built-in Rules
//!
//! `non-nil`, `non-zero`, `required`, `email` and `len(N)`, see [`rules`].
//! Custom rules are registered as [`RuleDescriptor`]s.
//!
//! ## Absent Values
//!
//! When an optional field holding a record is absent, the rules on the
//! fields of that record are still checked: any directive matching a rule
//! registered with [`RuleDescriptor::fail_on_absence`] fails with
//! [`ValidationError::Unreachable`].

// ValidationError carries a RuleError with its params and nested errors.
#![allow(clippy::result_large_err)]

// Lets `#[derive(Record)]` expand to `::ruletag::...` inside this crate too.
extern crate self as ruletag;

pub mod directive;
pub mod prelude;
pub mod rules;
pub mod value;

mod cache;
mod config;
mod context;
mod error;
mod path;
mod registry;
mod traversal;
mod validator;

pub use config::ValidatorConfig;
pub use context::{Context, RuleContext};
pub use error::{
    RuleError, SyntaxError, SyntaxErrorKind, ValidationError, ValidationResult, ValueError,
};
pub use path::FieldPath;
pub use registry::{Rule, RuleDescriptor, RuleRegistry};
pub use validator::{Validator, ValidatorBuilder};
pub use value::{Describe, Field, FieldDecl, Inspect, Kind, Shape};

#[cfg(feature = "derive")]
pub use ruletag_macros::Record;
