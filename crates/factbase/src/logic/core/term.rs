//! Terms: the arguments of a statement

use serde::{Deserialize, Serialize};
use std::fmt;

/// A term is either a constant symbol or a variable.
///
/// Variables are stored without their `?` sigil and are scoped to the
/// statement or rule they appear in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Variable(String),
    Constant(String),
}

impl Term {
    /// Create a constant term
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a variable term. A leading `?` is accepted and stripped.
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('?') {
            Some(stripped) => Term::Variable(stripped.to_string()),
            None => Term::Variable(name),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// The bare symbol name, without any sigil
    pub fn name(&self) -> &str {
        match self {
            Term::Variable(name) | Term::Constant(name) => name,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "?{}", name),
            Term::Constant(name) => write!(f, "{}", name),
        }
    }
}
