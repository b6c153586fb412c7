//! Statement unification
//!
//! Terms are flat (no function symbols), so unification is a single
//! left-to-right walk over term pairs and needs no occurs check.

use super::bindings::Bindings;
use crate::logic::core::{Statement, Term};

/// Unify two statements, returning the bindings that make them equal.
///
/// Returns `None` when predicates or arities differ, when two constants
/// clash, or when a variable would need two different values.
pub fn unify(a: &Statement, b: &Statement) -> Option<Bindings> {
    unify_with(a, b, Bindings::new())
}

/// Unify two equally long lists of statements under one set of bindings.
///
/// Variables shared between conjuncts must resolve to the same term in
/// every statement they occur in.
pub fn unify_all(a: &[Statement], b: &[Statement]) -> Option<Bindings> {
    if a.len() != b.len() {
        return None;
    }
    a.iter()
        .zip(b)
        .try_fold(Bindings::new(), |bindings, (s1, s2)| unify_with(s1, s2, bindings))
}

/// Unify two statements, extending existing bindings
pub fn unify_with(a: &Statement, b: &Statement, mut bindings: Bindings) -> Option<Bindings> {
    if a.predicate != b.predicate || a.terms.len() != b.terms.len() {
        return None;
    }
    for (t1, t2) in a.terms.iter().zip(&b.terms) {
        if !unify_terms(t1, t2, &mut bindings) {
            return None;
        }
    }
    Some(bindings)
}

fn unify_terms(t1: &Term, t2: &Term, bindings: &mut Bindings) -> bool {
    match (t1, t2) {
        _ if t1 == t2 => true,
        (Term::Variable(v), other) | (other, Term::Variable(v)) => bindings.test_and_bind(v, other),
        (Term::Constant(_), Term::Constant(_)) => false,
    }
}
