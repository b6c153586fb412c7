//! The knowledge base: deduplicated facts and rules with justifications
//!
//! ## Storage
//!
//! Facts and rules live in two insertion-ordered arenas keyed by `FactId` and
//! `RuleId`. Justifications (`Support`) refer to items by id, and a reverse
//! index maps every item to the items it helps justify, so a retraction can
//! find its dependents without scanning the whole base.
//!
//! ## Chaining
//!
//! Adding a new fact chains it through every stored rule; adding a new rule
//! chains every stored fact through it. Each derived item is added in turn,
//! recursively, until nothing new appears. Re-deriving an existing item only
//! appends a justification to the stored copy.
//!
//! ## Truth maintenance
//!
//! Retracting an asserted item with no other justification deletes it, then
//! strips every justification that mentioned it from its dependents. A
//! dependent left with no justification, and not asserted itself, is deleted
//! the same way.
//!
//! A justification that would make an item depend on itself is not recorded
//! in the graph but parked. After each cascade the parked derivations whose
//! fact and rule survived are added again, so anything still implied by the
//! remaining base comes back.

use super::answer::BindingSet;
use super::item::{Fact, FactId, Item, ItemId, Rule, RuleId, Support};
use crate::config::KbConfig;
use crate::error::{KbError, KbResult};
use crate::explain::Explainer;
use crate::inference::InferenceEngine;
use crate::logic::{unify, Statement};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, info};

/// Outcome of a retraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retraction {
    /// The item was deleted, together with everything that depended on it alone
    Removed { facts: usize, rules: usize },
    /// The item is still derivable, so it was only marked as not asserted
    Downgraded,
    /// The item was never asserted; retraction leaves it alone
    NotAsserted,
}

/// A forward-chaining knowledge base.
///
/// Every instance owns its own collections.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    config: KbConfig,
    engine: InferenceEngine,
    facts: IndexMap<FactId, Fact>,
    rules: IndexMap<RuleId, Rule>,
    fact_lookup: HashMap<Statement, FactId>,
    rule_lookup: HashMap<(Vec<Statement>, Statement), RuleId>,
    /// item -> items whose justifications mention it
    dependents: HashMap<ItemId, IndexSet<ItemId>>,
    /// Derivations held back because they would close a cycle, one support each
    parked: Vec<Item>,
    next_fact: u32,
    next_rule: u32,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        KnowledgeBase::new()
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        KnowledgeBase::with_config(KbConfig::default())
    }

    pub fn with_config(config: KbConfig) -> Self {
        KnowledgeBase {
            engine: InferenceEngine::new(config.verbosity),
            config,
            facts: IndexMap::new(),
            rules: IndexMap::new(),
            fact_lookup: HashMap::new(),
            rule_lookup: HashMap::new(),
            dependents: HashMap::new(),
            parked: Vec::new(),
            next_fact: 0,
            next_rule: 0,
        }
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Assert a fact or rule on the user's authority.
    ///
    /// Any justification carried by `item` is ignored. Facts must be ground,
    /// and every variable in a rule's consequent must occur in an antecedent.
    pub fn assert(&mut self, item: impl Into<Item>) -> KbResult<ItemId> {
        let item = item.into().into_assertion();
        validate_assertion(&item)?;
        if self.config.reports_mutations() {
            info!(item = %item, "asserting");
        }
        Ok(self.add(item))
    }

    /// Add an item and chain it to a fixpoint.
    ///
    /// The supports carried by `item` must reference items of this base.
    pub(crate) fn add(&mut self, item: Item) -> ItemId {
        if self.config.reports_derivations() {
            debug!(item = %item, supports = item.supported_by().len(), "adding");
        }
        match item {
            Item::Fact(fact) => ItemId::Fact(self.add_fact(fact)),
            Item::Rule(rule) => ItemId::Rule(self.add_rule(rule)),
        }
    }

    fn add_fact(&mut self, fact: Fact) -> FactId {
        if let Some(&id) = self.fact_lookup.get(&fact.statement) {
            self.merge(ItemId::Fact(id), Item::Fact(fact));
            return id;
        }

        let id = FactId(self.next_fact);
        self.next_fact += 1;
        self.link(ItemId::Fact(id), &fact.supported_by);
        self.fact_lookup.insert(fact.statement.clone(), id);
        self.facts.insert(id, fact);

        let rule_ids: Vec<RuleId> = self.rules.keys().copied().collect();
        for rule_id in rule_ids {
            let derived = match (self.facts.get(&id), self.rules.get(&rule_id)) {
                (Some(fact), Some(rule)) => self.engine.forward_chain((id, fact), (rule_id, rule)),
                _ => None,
            };
            if let Some(derived) = derived {
                self.add(derived);
            }
        }
        id
    }

    fn add_rule(&mut self, rule: Rule) -> RuleId {
        if let Some(&id) = self.rule_lookup.get(&rule_key(&rule)) {
            self.merge(ItemId::Rule(id), Item::Rule(rule));
            return id;
        }

        let id = RuleId(self.next_rule);
        self.next_rule += 1;
        self.link(ItemId::Rule(id), &rule.supported_by);
        self.rule_lookup.insert(rule_key(&rule), id);
        self.rules.insert(id, rule);

        let fact_ids: Vec<FactId> = self.facts.keys().copied().collect();
        for fact_id in fact_ids {
            let derived = match (self.facts.get(&fact_id), self.rules.get(&id)) {
                (Some(fact), Some(rule)) => self.engine.forward_chain((fact_id, fact), (id, rule)),
                _ => None,
            };
            if let Some(derived) = derived {
                self.add(derived);
            }
        }
        id
    }

    /// Fold an incoming duplicate into the stored copy.
    ///
    /// No justification means a direct assertion. Otherwise each new support
    /// is appended, except repeats. Supports that would make the item justify
    /// itself are parked instead.
    fn merge(&mut self, id: ItemId, incoming: Item) {
        if incoming.supported_by().is_empty() {
            if let Some(asserted) = self.asserted_flag_mut(id) {
                *asserted = true;
            }
            return;
        }

        let mut accepted = Vec::new();
        for &support in incoming.supported_by() {
            if self.supports_of(id).contains(&support) || accepted.contains(&support) {
                continue;
            }
            if self.would_cycle(id, support) {
                self.park(incoming.derived_by(support));
                continue;
            }
            accepted.push(support);
        }
        if accepted.is_empty() {
            return;
        }

        if self.config.reports_derivations() {
            debug!(item = %id, added = accepted.len(), "merging justifications");
        }
        self.link(id, &accepted);
        if let Some(supports) = self.supports_mut(id) {
            supports.extend(accepted);
        }
    }

    fn park(&mut self, derivation: Item) {
        let known = self
            .parked
            .iter()
            .any(|p| *p == derivation && p.supported_by() == derivation.supported_by());
        if !known {
            if self.config.reports_derivations() {
                debug!(item = %derivation, "parking circular justification");
            }
            self.parked.push(derivation);
        }
    }

    /// Re-add parked derivations whose fact and rule are both still stored.
    /// The rest can never apply again and are dropped.
    fn replay_parked(&mut self) {
        for derivation in std::mem::take(&mut self.parked) {
            let live = derivation
                .supported_by()
                .iter()
                .all(|s| self.facts.contains_key(&s.fact) && self.rules.contains_key(&s.rule));
            if live {
                self.add(derivation);
            }
        }
    }

    /// True if `support` already depends, directly or not, on `id`
    fn would_cycle(&self, id: ItemId, support: Support) -> bool {
        let targets = [ItemId::Fact(support.fact), ItemId::Rule(support.rule)];
        let mut seen = IndexSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if targets.contains(&current) {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(deps) = self.dependents.get(&current) {
                queue.extend(deps.iter().copied());
            }
        }
        false
    }

    /// Retract a directly asserted fact or rule.
    ///
    /// Fails with `NotFound` if no equal item is stored.
    pub fn retract(&mut self, item: impl Into<Item>) -> KbResult<Retraction> {
        let item = item.into();
        let id = self
            .find(&item)
            .ok_or_else(|| KbError::NotFound(item.to_string()))?;
        if self.config.reports_mutations() {
            info!(item = %item, "retracting");
        }

        if !self.is_asserted(id) {
            return Ok(Retraction::NotAsserted);
        }
        if !self.supports_of(id).is_empty() {
            if let Some(asserted) = self.asserted_flag_mut(id) {
                *asserted = false;
            }
            return Ok(Retraction::Downgraded);
        }

        let removed = self.remove_cascade(id);
        self.replay_parked();

        // Still implied by what is left: the user's assertion is all that went
        if self.contains(&item) {
            return Ok(Retraction::Downgraded);
        }
        let gone: Vec<&Item> = removed.iter().filter(|i| !self.contains(i)).collect();
        let facts = gone.iter().filter(|i| i.is_fact()).count();
        let rules = gone.len() - facts;
        if self.config.reports_mutations() {
            info!(facts, rules, "retraction removed items");
        }
        Ok(Retraction::Removed { facts, rules })
    }

    /// Delete `root` and every item left unjustified by its removal.
    /// Returns the deleted items.
    fn remove_cascade(&mut self, root: ItemId) -> Vec<Item> {
        let mut removed = Vec::new();
        let mut pending = vec![root];

        while let Some(id) = pending.pop() {
            let supports = match id {
                ItemId::Fact(fact_id) => match self.facts.shift_remove(&fact_id) {
                    Some(mut fact) => {
                        self.fact_lookup.remove(&fact.statement);
                        let supports = std::mem::take(&mut fact.supported_by);
                        removed.push(Item::Fact(fact));
                        supports
                    }
                    None => continue,
                },
                ItemId::Rule(rule_id) => match self.rules.shift_remove(&rule_id) {
                    Some(mut rule) => {
                        self.rule_lookup.remove(&rule_key(&rule));
                        let supports = std::mem::take(&mut rule.supported_by);
                        removed.push(Item::Rule(rule));
                        supports
                    }
                    None => continue,
                },
            };
            if self.config.reports_derivations() {
                debug!(item = %id, "removed");
            }

            for support in &supports {
                self.unlink(ItemId::Fact(support.fact), id);
                self.unlink(ItemId::Rule(support.rule), id);
            }

            let dependents = self.dependents.remove(&id).unwrap_or_default();
            for dependent in dependents {
                let lost: Vec<Support> = match self.supports_mut(dependent) {
                    Some(supports) => {
                        let (lost, kept): (Vec<Support>, Vec<Support>) =
                            supports.drain(..).partition(|s| s.mentions(id));
                        *supports = kept;
                        lost
                    }
                    None => continue,
                };
                for support in lost {
                    for other in [ItemId::Fact(support.fact), ItemId::Rule(support.rule)] {
                        if other != id && !self.supports_of(dependent).iter().any(|s| s.mentions(other)) {
                            self.unlink(other, dependent);
                        }
                    }
                }
                if self.supports_of(dependent).is_empty() && !self.is_asserted(dependent) {
                    pending.push(dependent);
                }
            }
        }
        removed
    }

    fn link(&mut self, dependent: ItemId, supports: &[Support]) {
        for support in supports {
            for supporter in [ItemId::Fact(support.fact), ItemId::Rule(support.rule)] {
                self.dependents.entry(supporter).or_default().insert(dependent);
            }
        }
    }

    fn unlink(&mut self, supporter: ItemId, dependent: ItemId) {
        if let Some(deps) = self.dependents.get_mut(&supporter) {
            deps.shift_remove(&dependent);
            if deps.is_empty() {
                self.dependents.remove(&supporter);
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Ask which stored facts match a fact-shaped query.
    ///
    /// Each matching fact contributes one answer, in storage order. A
    /// rule-shaped query is an `InvalidQuery` error; no match is an empty set.
    pub fn ask(&self, query: impl Into<Item>) -> KbResult<BindingSet> {
        let statement = match query.into() {
            Item::Fact(fact) => fact.statement,
            Item::Rule(rule) => return Err(KbError::InvalidQuery(rule.to_string())),
        };
        if self.config.reports_queries() {
            debug!(query = %statement, "asking");
        }

        let mut answers = BindingSet::new();
        for fact in self.facts.values() {
            if let Some(bindings) = unify(&statement, &fact.statement) {
                answers.push(bindings, vec![fact.clone()]);
            }
        }
        Ok(answers)
    }

    /// Render the derivation tree of a stored fact or rule
    pub fn explain(&self, item: impl Into<Item>) -> KbResult<String> {
        let item = item.into();
        let id = self
            .find(&item)
            .ok_or_else(|| KbError::NotFound(item.to_string()))?;
        Ok(Explainer::new(self, self.config.explain_indent).explain(id))
    }

    /// Every fact then every rule, one per line
    pub fn dump(&self) -> String {
        self.to_string()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Stored facts in storage order
    pub fn facts(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.facts.iter().map(|(id, fact)| (*id, fact))
    }

    /// Stored rules in storage order
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter().map(|(id, rule)| (*id, rule))
    }

    pub fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    /// The stored copy of a fact
    pub fn get_fact(&self, fact: &Fact) -> Option<&Fact> {
        self.fact_lookup
            .get(&fact.statement)
            .and_then(|id| self.facts.get(id))
    }

    /// The stored copy of a rule
    pub fn get_rule(&self, rule: &Rule) -> Option<&Rule> {
        self.rule_lookup
            .get(&rule_key(rule))
            .and_then(|id| self.rules.get(id))
    }

    /// The id an equal item is stored under
    pub fn find(&self, item: &Item) -> Option<ItemId> {
        match item {
            Item::Fact(fact) => self.fact_lookup.get(&fact.statement).copied().map(ItemId::Fact),
            Item::Rule(rule) => self.rule_lookup.get(&rule_key(rule)).copied().map(ItemId::Rule),
        }
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.find(item).is_some()
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Total number of stored facts and rules
    pub fn len(&self) -> usize {
        self.facts.len() + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }

    /// Items whose justifications mention `id`
    pub fn dependents(&self, id: ItemId) -> Vec<ItemId> {
        self.dependents
            .get(&id)
            .map(|deps| deps.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn is_asserted(&self, id: ItemId) -> bool {
        match id {
            ItemId::Fact(fact_id) => self.facts.get(&fact_id).is_some_and(|f| f.asserted),
            ItemId::Rule(rule_id) => self.rules.get(&rule_id).is_some_and(|r| r.asserted),
        }
    }

    pub(crate) fn supports_of(&self, id: ItemId) -> &[Support] {
        match id {
            ItemId::Fact(fact_id) => self.facts.get(&fact_id).map(|f| f.supported_by.as_slice()).unwrap_or(&[]),
            ItemId::Rule(rule_id) => self.rules.get(&rule_id).map(|r| r.supported_by.as_slice()).unwrap_or(&[]),
        }
    }

    fn supports_mut(&mut self, id: ItemId) -> Option<&mut Vec<Support>> {
        match id {
            ItemId::Fact(fact_id) => self.facts.get_mut(&fact_id).map(|f| &mut f.supported_by),
            ItemId::Rule(rule_id) => self.rules.get_mut(&rule_id).map(|r| &mut r.supported_by),
        }
    }

    fn asserted_flag_mut(&mut self, id: ItemId) -> Option<&mut bool> {
        match id {
            ItemId::Fact(fact_id) => self.facts.get_mut(&fact_id).map(|f| &mut f.asserted),
            ItemId::Rule(rule_id) => self.rules.get_mut(&rule_id).map(|r| &mut r.asserted),
        }
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Knowledge Base:")?;
        for fact in self.facts.values() {
            writeln!(f, "{}", fact)?;
        }
        for rule in self.rules.values() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

fn rule_key(rule: &Rule) -> (Vec<Statement>, Statement) {
    (rule.lhs.clone(), rule.rhs.clone())
}

fn validate_assertion(item: &Item) -> KbResult<()> {
    match item {
        Item::Fact(fact) => {
            if !fact.statement.is_ground() {
                return Err(KbError::NonGroundFact(fact.statement.to_string()));
            }
        }
        Item::Rule(rule) => {
            if rule.lhs.is_empty() {
                return Err(KbError::EmptyAntecedent(rule.to_string()));
            }
            if let Some(var) = rule.unbound_consequent_variable() {
                return Err(KbError::UnboundConsequent {
                    rule: rule.to_string(),
                    variable: var.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Verbosity;
    use crate::logic::Term;

    fn st(predicate: &str, terms: &[&str]) -> Statement {
        let terms = terms
            .iter()
            .map(|t| match t.strip_prefix('?') {
                Some(var) => Term::variable(var),
                None => Term::constant(*t),
            })
            .collect();
        Statement::new(predicate, terms)
    }

    fn fact(predicate: &str, terms: &[&str]) -> Fact {
        Fact::new(st(predicate, terms))
    }

    fn quiet_kb() -> KnowledgeBase {
        KnowledgeBase::with_config(KbConfig::default().with_verbosity(Verbosity::Quiet))
    }

    #[test]
    fn test_add_merges_justification_into_stored_copy() {
        let mut kb = quiet_kb();
        let p = kb.assert(fact("p", &["a"])).unwrap();
        let r1 = kb.assert(Rule::new(vec![st("p", &["?x"])], st("q", &["?x"]))).unwrap();
        let (ItemId::Fact(p), ItemId::Rule(r1)) = (p, r1) else {
            panic!("unexpected ids");
        };

        let q = kb.get_fact(&fact("q", &["a"])).unwrap();
        assert_eq!(q.supported_by, vec![Support::new(p, r1)]);

        // Re-adding the same derivation does not duplicate the justification
        kb.add(Item::Fact(Fact::derived(st("q", &["a"]), Support::new(p, r1))));
        assert_eq!(kb.get_fact(&fact("q", &["a"])).unwrap().supported_by.len(), 1);
        assert_eq!(kb.fact_count(), 2);
    }

    #[test]
    fn test_direct_assertion_of_derived_fact_sets_flag() {
        let mut kb = quiet_kb();
        kb.assert(fact("p", &["a"])).unwrap();
        kb.assert(Rule::new(vec![st("p", &["?x"])], st("q", &["?x"]))).unwrap();
        assert!(!kb.get_fact(&fact("q", &["a"])).unwrap().asserted);

        kb.assert(fact("q", &["a"])).unwrap();
        let q = kb.get_fact(&fact("q", &["a"])).unwrap();
        assert!(q.asserted);
        assert_eq!(q.supported_by.len(), 1);
    }

    #[test]
    fn test_dependents_index_follows_supports() {
        let mut kb = quiet_kb();
        let p = kb.assert(fact("p", &["a"])).unwrap();
        let rule = kb.assert(Rule::new(vec![st("p", &["?x"])], st("q", &["?x"]))).unwrap();
        let q = kb.find(&Item::Fact(fact("q", &["a"]))).unwrap();

        assert_eq!(kb.dependents(p), vec![q]);
        assert_eq!(kb.dependents(rule), vec![q]);
        assert!(kb.dependents(q).is_empty());

        kb.retract(fact("p", &["a"])).unwrap();
        assert!(kb.dependents(rule).is_empty());
    }

    #[test]
    fn test_circular_support_is_not_recorded() {
        let mut kb = quiet_kb();
        kb.assert(Rule::new(vec![st("p", &["?x"])], st("q", &["?x"]))).unwrap();
        kb.assert(Rule::new(vec![st("q", &["?x"])], st("p", &["?x"]))).unwrap();
        kb.assert(fact("p", &["a"])).unwrap();

        // (p a) would be re-derived from (q a), which was derived from (p a)
        let p = kb.get_fact(&fact("p", &["a"])).unwrap();
        assert!(p.asserted);
        assert!(p.supported_by.is_empty());

        let outcome = kb.retract(fact("p", &["a"])).unwrap();
        assert_eq!(outcome, Retraction::Removed { facts: 2, rules: 0 });
        assert_eq!(kb.fact_count(), 0);
    }

    #[test]
    fn test_assert_rejects_malformed_items() {
        let mut kb = quiet_kb();
        assert!(matches!(kb.assert(fact("p", &["?x"])), Err(KbError::NonGroundFact(_))));
        assert!(matches!(
            kb.assert(Rule::new(vec![], st("p", &["a"]))),
            Err(KbError::EmptyAntecedent(_))
        ));
        assert!(matches!(
            kb.assert(Rule::new(vec![st("p", &["?x"])], st("q", &["?y"]))),
            Err(KbError::UnboundConsequent { ref variable, .. }) if variable == "y"
        ));
        assert!(kb.is_empty());
    }

    #[test]
    fn test_instances_do_not_share_storage() {
        let mut a = quiet_kb();
        let b = quiet_kb();
        a.assert(fact("p", &["a"])).unwrap();
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn test_dump_lists_facts_then_rules() {
        let mut kb = quiet_kb();
        kb.assert(Rule::new(vec![st("p", &["?x"])], st("q", &["?x"]))).unwrap();
        kb.assert(fact("p", &["a"])).unwrap();
        assert_eq!(
            kb.dump(),
            "Knowledge Base:\nfact: (p a)\nfact: (q a)\nrule: ((p ?x)) -> (q ?x)\n"
        );
    }
}
