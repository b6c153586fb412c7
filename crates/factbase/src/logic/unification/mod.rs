//! Unification and substitution for statements

pub mod bindings;
mod unify;

#[cfg(test)]
mod proptest_tests;

pub use bindings::{instantiate, Bindings};
pub use unify::{unify, unify_all, unify_with};
