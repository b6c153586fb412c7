//! Statements: a predicate applied to an ordered list of terms

use super::term::Term;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicate applied to terms, e.g. `(on ?x table)`.
///
/// Two statements are equal iff their predicates and term sequences are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    pub predicate: String,
    pub terms: Vec<Term>,
}

impl Statement {
    pub fn new(predicate: impl Into<String>, terms: Vec<Term>) -> Self {
        Statement {
            predicate: predicate.into(),
            terms,
        }
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// True if no term is a variable
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_constant)
    }

    /// Variable names in order of first occurrence
    pub fn variables(&self) -> IndexSet<&str> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    pub(crate) fn collect_variables<'a>(&'a self, vars: &mut IndexSet<&'a str>) {
        for term in &self.terms {
            if let Term::Variable(name) = term {
                vars.insert(name.as_str());
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for term in &self.terms {
            write!(f, " {}", term)?;
        }
        write!(f, ")")
    }
}
