//! # ruletag macros
//!
//! Derive macros for `ruletag`.
//!
//! | Macro | Description |
//! |-------|-------------|
//! | [`Record`](derive@Record) | Implements `Inspect` and `Describe` for a named struct |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod record;
mod support;

/// Derive macro for the `Inspect` and `Describe` traits.
///
/// The struct becomes a record whose fields are visited in declaration
/// order. Every field type must implement `Inspect` and `Describe`.
///
/// # Field attributes
///
/// - `#[rule("...")]` - Rule text evaluated against the field
/// - `#[rule(skip)]` - Hides the field from validation entirely
///
/// Fields without an attribute carry empty rule text but are still
/// descended into when they hold records.
///
/// # Example
///
/// ```ignore
/// #[derive(Record)]
/// struct User {
///     #[rule("required && email")]
///     email: String,
///
///     #[rule("non-nil")]
///     address: Option<Box<Address>>,
///
///     #[rule(skip)]
///     cache: SessionCache,
/// }
/// ```
#[proc_macro_derive(Record, attributes(rule))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}
