//! Variable bindings produced by unification

use crate::logic::core::{Statement, Term};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mapping from variable names to terms.
///
/// Bindings keep the order in which variables were first bound, which is
/// also the order they are displayed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    map: IndexMap<String, Term>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings {
            map: IndexMap::new(),
        }
    }

    /// Get the term a variable is bound to, if any
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.map.get(var)
    }

    pub fn contains(&self, var: &str) -> bool {
        self.map.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.map.iter().map(|(var, term)| (var.as_str(), term))
    }

    /// Bind `var` to `value` unless it is already bound to something else.
    ///
    /// Returns false (leaving the bindings untouched) on a conflicting binding.
    pub(crate) fn test_and_bind(&mut self, var: &str, value: &Term) -> bool {
        match self.map.get(var) {
            Some(bound) => bound == value,
            None => {
                self.map.insert(var.to_string(), value.clone());
                true
            }
        }
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, term)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?{} : {}", var, term)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, Term)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (S, Term)>>(iter: I) -> Self {
        Bindings {
            map: iter.into_iter().map(|(var, term)| (var.into(), term)).collect(),
        }
    }
}

impl Term {
    /// Apply bindings to this term. Unbound variables are left in place.
    pub fn apply_bindings(&self, bindings: &Bindings) -> Term {
        match self {
            Term::Variable(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Term::Constant(_) => self.clone(),
        }
    }
}

impl Statement {
    /// Apply bindings to every term of this statement
    pub fn apply_bindings(&self, bindings: &Bindings) -> Statement {
        Statement {
            predicate: self.predicate.clone(),
            terms: self.terms.iter().map(|t| t.apply_bindings(bindings)).collect(),
        }
    }
}

/// Substitute bound variables through a statement
pub fn instantiate(statement: &Statement, bindings: &Bindings) -> Statement {
    statement.apply_bindings(bindings)
}
