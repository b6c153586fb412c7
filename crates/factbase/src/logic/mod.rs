//! Logical representation: terms, statements, and unification
//!
//! Statements are flat: a predicate applied to constants and variables.
//! Variables are scoped to the statement or rule that contains them.

pub mod core;
pub mod unification;

pub use self::core::{Statement, Term};
pub use unification::{instantiate, unify, unify_all, unify_with, Bindings};
