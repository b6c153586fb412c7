//! Facts, rules, and the identifiers the knowledge base stores them under

use crate::logic::Statement;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Index of a fact inside one knowledge base
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactId(pub(crate) u32);

/// Index of a rule inside one knowledge base
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub(crate) u32);

impl FactId {
    /// Get the raw ID value (for debugging/serialization)
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl RuleId {
    /// Get the raw ID value (for debugging/serialization)
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Either kind of stored item
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemId {
    Fact(FactId),
    Rule(RuleId),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Fact(id) => write!(f, "fact#{}", id.0),
            ItemId::Rule(id) => write!(f, "rule#{}", id.0),
        }
    }
}

/// One justification: the fact and rule a derived item was inferred from
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Support {
    pub fact: FactId,
    pub rule: RuleId,
}

impl Support {
    pub fn new(fact: FactId, rule: RuleId) -> Self {
        Support { fact, rule }
    }

    /// True if either half of the pair is `id`
    pub fn mentions(&self, id: ItemId) -> bool {
        match id {
            ItemId::Fact(fact) => self.fact == fact,
            ItemId::Rule(rule) => self.rule == rule,
        }
    }
}

/// A statement held true by the knowledge base.
///
/// Equality and hashing only look at the statement: the same statement
/// asserted and derived is one fact with several justifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub statement: Statement,
    /// Told directly by the user
    pub asserted: bool,
    pub supported_by: Vec<Support>,
}

impl Fact {
    /// A fact as the user asserts it: no justification
    pub fn new(statement: Statement) -> Self {
        Fact {
            statement,
            asserted: true,
            supported_by: Vec::new(),
        }
    }

    /// A fact produced by forward chaining
    pub fn derived(statement: Statement, support: Support) -> Self {
        Fact {
            statement,
            asserted: false,
            supported_by: vec![support],
        }
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.statement == other.statement
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.statement.hash(state);
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fact: {}", self.statement)
    }
}

/// A conjunction of antecedents implying one consequent.
///
/// Variables are scoped to the rule. Equality and hashing only look at
/// `lhs` and `rhs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub lhs: Vec<Statement>,
    pub rhs: Statement,
    /// Told directly by the user
    pub asserted: bool,
    pub supported_by: Vec<Support>,
}

impl Rule {
    /// A rule as the user asserts it: no justification
    pub fn new(lhs: Vec<Statement>, rhs: Statement) -> Self {
        Rule {
            lhs,
            rhs,
            asserted: true,
            supported_by: Vec::new(),
        }
    }

    /// A residual rule produced by forward chaining
    pub fn derived(lhs: Vec<Statement>, rhs: Statement, support: Support) -> Self {
        Rule {
            lhs,
            rhs,
            asserted: false,
            supported_by: vec![support],
        }
    }

    /// First variable of the consequent that no antecedent mentions
    pub fn unbound_consequent_variable(&self) -> Option<&str> {
        let mut bound = indexmap::IndexSet::new();
        for antecedent in &self.lhs {
            antecedent.collect_variables(&mut bound);
        }
        self.rhs
            .variables()
            .into_iter()
            .find(|var| !bound.contains(var))
    }

    /// Antecedents written as `((a ...), (b ...))`
    pub fn lhs_display(&self) -> String {
        let parts: Vec<String> = self.lhs.iter().map(|s| s.to_string()).collect();
        format!("({})", parts.join(", "))
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule: {} -> {}", self.lhs_display(), self.rhs)
    }
}

/// A fact or a rule. Both take part in chaining and justification the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Fact(Fact),
    Rule(Rule),
}

impl Item {
    pub fn is_fact(&self) -> bool {
        matches!(self, Item::Fact(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, Item::Rule(_))
    }

    pub fn is_asserted(&self) -> bool {
        match self {
            Item::Fact(fact) => fact.asserted,
            Item::Rule(rule) => rule.asserted,
        }
    }

    pub fn supported_by(&self) -> &[Support] {
        match self {
            Item::Fact(fact) => &fact.supported_by,
            Item::Rule(rule) => &rule.supported_by,
        }
    }

    pub fn as_fact(&self) -> Option<&Fact> {
        match self {
            Item::Fact(fact) => Some(fact),
            Item::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Item::Rule(rule) => Some(rule),
            Item::Fact(_) => None,
        }
    }

    /// Reset to a plain user assertion
    pub(crate) fn into_assertion(self) -> Item {
        match self {
            Item::Fact(fact) => Item::Fact(Fact::new(fact.statement)),
            Item::Rule(rule) => Item::Rule(Rule::new(rule.lhs, rule.rhs)),
        }
    }

    /// Same content, justified by `support` alone
    pub(crate) fn derived_by(&self, support: Support) -> Item {
        match self {
            Item::Fact(fact) => Item::Fact(Fact::derived(fact.statement.clone(), support)),
            Item::Rule(rule) => Item::Rule(Rule::derived(rule.lhs.clone(), rule.rhs.clone(), support)),
        }
    }
}

impl From<Fact> for Item {
    fn from(fact: Fact) -> Self {
        Item::Fact(fact)
    }
}

impl From<Rule> for Item {
    fn from(rule: Rule) -> Self {
        Item::Rule(rule)
    }
}

/// A bare statement is a fact-shaped item
impl From<Statement> for Item {
    fn from(statement: Statement) -> Self {
        Item::Fact(Fact::new(statement))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Fact(fact) => write!(f, "{}", fact),
            Item::Rule(rule) => write!(f, "{}", rule),
        }
    }
}
