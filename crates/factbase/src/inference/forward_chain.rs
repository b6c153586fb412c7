//! The forward-chaining step.
//!
//! Given a fact and a rule, unify the fact with the rule's first antecedent.
//! On success the bindings are pushed through the rest of the rule:
//!
//! - a rule with one antecedent yields its instantiated consequent as a fact;
//! - a longer rule yields a residual rule with one antecedent fewer.
//!
//! Either way the derived item is justified by exactly the (fact, rule) pair
//! it came from. Feeding the result back into the knowledge base is the
//! caller's job.

use crate::config::Verbosity;
use crate::kb::{Fact, FactId, Item, Rule, RuleId, Support};
use crate::logic::unify;
use tracing::{debug, trace};

/// Derives new items from one fact and one rule
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine {
    verbosity: Verbosity,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        InferenceEngine::new(Verbosity::default())
    }
}

impl InferenceEngine {
    pub fn new(verbosity: Verbosity) -> Self {
        InferenceEngine { verbosity }
    }

    /// Try to chain `fact` through `rule`.
    ///
    /// Returns `None` when the fact does not match the first antecedent, or
    /// when the rule has no antecedents at all.
    pub fn forward_chain(&self, fact: (FactId, &Fact), rule: (RuleId, &Rule)) -> Option<Item> {
        let (fact_id, fact) = fact;
        let (rule_id, rule) = rule;

        if self.verbosity >= Verbosity::Derivations {
            trace!(
                fact = %fact.statement,
                lhs = %rule.lhs_display(),
                rhs = %rule.rhs,
                "attempting to infer"
            );
        }

        let (first, rest) = rule.lhs.split_first()?;
        let bindings = unify(&fact.statement, first)?;

        let support = Support::new(fact_id, rule_id);
        let rhs = rule.rhs.apply_bindings(&bindings);
        let derived = if rest.is_empty() {
            Item::Fact(Fact::derived(rhs, support))
        } else {
            let lhs = rest.iter().map(|s| s.apply_bindings(&bindings)).collect();
            Item::Rule(Rule::derived(lhs, rhs, support))
        };

        if self.verbosity >= Verbosity::Derivations {
            debug!(derived = %derived, bindings = %bindings, "inferred");
        }
        Some(derived)
    }
}
