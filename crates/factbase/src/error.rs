//! Error types for factbase

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KbError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found in knowledge base: {0}")]
    NotFound(String),

    #[error("Facts must be ground, found variables in {0}")]
    NonGroundFact(String),

    #[error("Rule has no antecedents: {0}")]
    EmptyAntecedent(String),

    #[error("Variable ?{variable} in the consequent of {rule} is not bound by any antecedent")]
    UnboundConsequent { rule: String, variable: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type KbResult<T> = std::result::Result<T, KbError>;
