//! factbase: a forward-chaining knowledge base with truth maintenance
//!
//! Facts and if-then rules over flat first-order statements are kept in a
//! knowledge base. Every new fact is chained through the stored rules (and
//! every new rule through the stored facts) until nothing new can be derived.
//! Each derived item remembers the (fact, rule) pairs that justify it, so it
//! can be explained and is retracted once its last justification goes away.

pub mod config;
pub mod error;
pub mod explain;
pub mod inference;
pub mod json;
pub mod kb;
pub mod logic;
pub mod parser;

pub use config::{KbConfig, Verbosity};
pub use error::{KbError, KbResult};
pub use explain::Explainer;
pub use inference::InferenceEngine;
pub use json::KnowledgeBaseJson;
pub use kb::{
    Answer, BindingSet, Fact, FactId, Item, ItemId, KnowledgeBase, Retraction, Rule, RuleId,
    Support,
};
pub use logic::{instantiate, unify, unify_all, unify_with, Bindings, Statement, Term};
pub use parser::{parse_item, parse_items, parse_statement, read_items};
