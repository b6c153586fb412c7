//! Reader for the textual statement syntax

pub mod statements;

pub use statements::{parse_item, parse_items, parse_statement, read_items};
