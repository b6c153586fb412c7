//! Knowledge base: facts, rules, justifications, and queries

pub mod answer;
pub mod item;
pub mod store;

pub use answer::{Answer, BindingSet};
pub use item::{Fact, FactId, Item, ItemId, Rule, RuleId, Support};
pub use store::{KnowledgeBase, Retraction};
