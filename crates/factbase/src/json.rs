//! JSON serialization types for knowledge base snapshots

use crate::kb::{Fact, FactId, KnowledgeBase, Rule, RuleId, Support};
use crate::logic::{Statement, Term};
use serde::{Deserialize, Serialize};

/// JSON representation of a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Constant { name: String },
}

impl From<&Term> for TermJson {
    fn from(term: &Term) -> Self {
        match term {
            Term::Variable(name) => TermJson::Variable { name: name.clone() },
            Term::Constant(name) => TermJson::Constant { name: name.clone() },
        }
    }
}

/// JSON representation of a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementJson {
    pub predicate: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub terms: Vec<TermJson>,
}

impl From<&Statement> for StatementJson {
    fn from(statement: &Statement) -> Self {
        StatementJson {
            predicate: statement.predicate.clone(),
            terms: statement.terms.iter().map(TermJson::from).collect(),
        }
    }
}

/// JSON representation of one justification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportJson {
    pub fact: u32,
    pub rule: u32,
}

impl From<&Support> for SupportJson {
    fn from(support: &Support) -> Self {
        SupportJson {
            fact: support.fact.as_u32(),
            rule: support.rule.as_u32(),
        }
    }
}

/// JSON representation of a stored fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactJson {
    pub id: u32,
    pub statement: StatementJson,
    pub asserted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub supported_by: Vec<SupportJson>,
}

impl FactJson {
    pub fn from_fact(id: FactId, fact: &Fact) -> Self {
        FactJson {
            id: id.as_u32(),
            statement: (&fact.statement).into(),
            asserted: fact.asserted,
            supported_by: fact.supported_by.iter().map(SupportJson::from).collect(),
        }
    }
}

/// JSON representation of a stored rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleJson {
    pub id: u32,
    pub lhs: Vec<StatementJson>,
    pub rhs: StatementJson,
    pub asserted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub supported_by: Vec<SupportJson>,
}

impl RuleJson {
    pub fn from_rule(id: RuleId, rule: &Rule) -> Self {
        RuleJson {
            id: id.as_u32(),
            lhs: rule.lhs.iter().map(StatementJson::from).collect(),
            rhs: (&rule.rhs).into(),
            asserted: rule.asserted,
            supported_by: rule.supported_by.iter().map(SupportJson::from).collect(),
        }
    }
}

/// JSON representation of a whole knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseJson {
    pub facts: Vec<FactJson>,
    pub rules: Vec<RuleJson>,
}

impl KnowledgeBaseJson {
    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&KnowledgeBase> for KnowledgeBaseJson {
    fn from(kb: &KnowledgeBase) -> Self {
        KnowledgeBaseJson {
            facts: kb.facts().map(|(id, fact)| FactJson::from_fact(id, fact)).collect(),
            rules: kb.rules().map(|(id, rule)| RuleJson::from_rule(id, rule)).collect(),
        }
    }
}

impl KnowledgeBase {
    /// Snapshot the knowledge base for serialization
    pub fn to_json(&self) -> KnowledgeBaseJson {
        self.into()
    }
}
