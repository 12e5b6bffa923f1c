//! Directive expression language
//!
//! Rule text attached to a field is a small boolean language over directives:
//!
//! ```text
//! Expr     := "!" Expr | If | "(" Chain ")" | Directive
//! If       := "if(" Chain ")then(" Chain ")" {"elif(" Chain ")then(" Chain ")"} ["else(" Chain ")"]
//! Chain    := Expr [("&&" | "||") Chain]
//! ```
//!
//! Whitespace is insignificant. `&&` and `||` bind with equal strength and
//! chain to the right. Chains may be arbitrarily long; negations, groups
//! and conditionals nest at most [`MAX_NESTING_DEPTH`] levels deep.

mod ast;
mod eval;
mod parser;

pub use ast::{Branch, Expr, LogicalOp, MAX_NESTING_DEPTH};
pub use eval::{Evaluator, Failure};
pub use parser::{parse, strip_whitespace};
