//! Property-based tests for unification using proptest.
//!
//! The engine only ever unifies a pattern against a ground statement, so the
//! soundness and symmetry properties are stated for that shape of input.

use super::{unify, unify_all, Bindings};
use crate::logic::{Statement, Term};
use proptest::prelude::*;

/// Term description (before naming)
#[derive(Debug, Clone)]
enum TermDesc {
    Var(u8),   // Variable index 0-2
    Const(u8), // Constant index 0-2
}

fn arb_term_desc() -> BoxedStrategy<TermDesc> {
    prop_oneof![
        (0..3u8).prop_map(TermDesc::Var),
        (0..3u8).prop_map(TermDesc::Const),
    ]
    .boxed()
}

fn arb_ground_term_desc() -> BoxedStrategy<TermDesc> {
    (0..3u8).prop_map(TermDesc::Const).boxed()
}

fn build_term(desc: &TermDesc) -> Term {
    match desc {
        TermDesc::Var(i) => Term::variable(format!("x{}", i)),
        TermDesc::Const(i) => Term::constant(format!("c{}", i)),
    }
}

fn build_statement(predicate: u8, terms: &[TermDesc]) -> Statement {
    Statement::new(format!("p{}", predicate), terms.iter().map(build_term).collect())
}

/// A statement that may contain variables
fn arb_pattern() -> impl Strategy<Value = Statement> {
    (0..2u8, proptest::collection::vec(arb_term_desc(), 0..4))
        .prop_map(|(p, terms)| build_statement(p, &terms))
}

/// A variable-free statement
fn arb_ground() -> impl Strategy<Value = Statement> {
    (0..2u8, proptest::collection::vec(arb_ground_term_desc(), 0..4))
        .prop_map(|(p, terms)| build_statement(p, &terms))
}

// =========================================================================
// Unification properties
// =========================================================================

proptest! {
    /// Soundness: if unify(g, p) = σ, then pσ = g
    #[test]
    fn unification_soundness(pattern in arb_pattern(), ground in arb_ground()) {
        if let Some(sigma) = unify(&ground, &pattern) {
            prop_assert_eq!(pattern.apply_bindings(&sigma), ground, "bindings must make statements equal");
        }
    }

    /// Symmetry: unify(g, p) succeeds iff unify(p, g) succeeds, with the same bindings
    #[test]
    fn unification_symmetry(pattern in arb_pattern(), ground in arb_ground()) {
        let r1 = unify(&ground, &pattern);
        let r2 = unify(&pattern, &ground);
        prop_assert_eq!(r1, r2, "unification should be symmetric");
    }

    /// Identity: a statement always unifies with itself, binding nothing
    #[test]
    fn unification_identity(statement in arb_pattern()) {
        let result = unify(&statement, &statement);
        prop_assert_eq!(result, Some(Bindings::new()), "statement should unify with itself");
    }

    /// Completeness: instantiating a pattern always yields something it unifies with
    #[test]
    fn unification_completeness(pattern in arb_pattern(), value in 0..3u8) {
        let bindings: Bindings = pattern
            .variables()
            .into_iter()
            .map(|var| (var.to_string(), Term::constant(format!("c{}", value))))
            .collect();
        let ground = pattern.apply_bindings(&bindings);
        prop_assert!(ground.is_ground());
        prop_assert!(unify(&ground, &pattern).is_some(), "pattern must match its own instance");
    }

    /// A conjunction unifies iff it unifies statement by statement under shared bindings
    #[test]
    fn unify_all_agrees_with_single_statement(pattern in arb_pattern(), ground in arb_ground()) {
        prop_assert_eq!(
            unify_all(std::slice::from_ref(&ground), std::slice::from_ref(&pattern)),
            unify(&ground, &pattern)
        );
    }
}

// =========================================================================
// Substitution properties
// =========================================================================

proptest! {
    /// Empty bindings are the identity
    #[test]
    fn substitution_identity(statement in arb_pattern()) {
        let applied = statement.apply_bindings(&Bindings::new());
        prop_assert_eq!(statement, applied, "empty bindings should be identity");
    }
}
