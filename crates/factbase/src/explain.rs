//! Derivation trees for stored facts and rules
//!
//! ```text
//! fact: (q a)
//!   SUPPORTED BY
//!     fact: (p a) ASSERTED
//!     rule: ((p ?x)) -> (q ?x) ASSERTED
//! ```
//!
//! Each supporting fact and rule is followed by its own supports, indented
//! one level further.
//!
//! The output is a tree, not a graph: an item that supports several others is
//! written out again under each of them, so the text (and the time to build
//! it) grows with the number of derivation paths rather than with the number
//! of stored items.

use crate::kb::{ItemId, KnowledgeBase, Support};
use std::fmt;

/// Renders explanations against one knowledge base
pub struct Explainer<'a> {
    kb: &'a KnowledgeBase,
    indent: usize,
}

impl<'a> Explainer<'a> {
    pub fn new(kb: &'a KnowledgeBase, indent: usize) -> Self {
        Explainer { kb, indent }
    }

    /// Render the item stored under `id`, or an empty string if there is none
    pub fn explain(&self, id: ItemId) -> String {
        Explanation { explainer: self, id }.to_string()
    }

    fn write_supports(&self, f: &mut fmt::Formatter<'_>, id: ItemId, depth: usize) -> fmt::Result {
        let pad = " ".repeat(self.indent * depth);
        for &Support { fact, rule } in self.kb.supports_of(id) {
            writeln!(f, "{}  SUPPORTED BY", pad)?;
            for supporter in [ItemId::Fact(fact), ItemId::Rule(rule)] {
                if let Some(line) = self.item_line(supporter) {
                    writeln!(f, "{}    {}", pad, line)?;
                }
                self.write_supports(f, supporter, depth + 1)?;
            }
        }
        Ok(())
    }

    fn item_line(&self, id: ItemId) -> Option<String> {
        let (text, asserted) = match id {
            ItemId::Fact(fact_id) => {
                let fact = self.kb.fact(fact_id)?;
                (fact.to_string(), fact.asserted)
            }
            ItemId::Rule(rule_id) => {
                let rule = self.kb.rule(rule_id)?;
                (rule.to_string(), rule.asserted)
            }
        };
        Some(if asserted {
            format!("{} ASSERTED", text)
        } else {
            text
        })
    }
}

/// One item's derivation tree, rendered on demand
struct Explanation<'e, 'a> {
    explainer: &'e Explainer<'a>,
    id: ItemId,
}

impl fmt::Display for Explanation<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.explainer.item_line(self.id) {
            writeln!(f, "{}", line)?;
            self.explainer.write_supports(f, self.id, 0)?;
        }
        Ok(())
    }
}
