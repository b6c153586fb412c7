//! Core term and statement types

pub mod statement;
pub mod term;

pub use statement::Statement;
pub use term::Term;
