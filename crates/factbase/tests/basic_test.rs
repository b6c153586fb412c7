//! Integration tests for assertion, chaining, and queries

use factbase::{
    parse_item, parse_statement, Bindings, Fact, Item, ItemId, KbConfig, KbError, KnowledgeBase,
    Statement, Support, Term, Verbosity,
};

fn kb() -> KnowledgeBase {
    KnowledgeBase::with_config(KbConfig::default().with_verbosity(Verbosity::Quiet))
}

fn st(text: &str) -> Statement {
    parse_statement(text).expect("statement should parse")
}

fn item(text: &str) -> Item {
    parse_item(text).expect("item should parse")
}

/// Every fact and rule, as sorted text, for comparing final states
fn contents(kb: &KnowledgeBase) -> Vec<String> {
    let mut all: Vec<String> = kb.facts().map(|(_, f)| f.to_string()).collect();
    all.extend(kb.rules().map(|(_, r)| r.to_string()));
    all.sort();
    all
}

fn permutations(items: &[Item]) -> Vec<Vec<Item>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first.clone());
            result.push(tail);
        }
    }
    result
}

#[test]
fn test_idempotent_assertion() {
    let mut kb = kb();
    kb.assert(st("(p a)")).unwrap();
    assert_eq!(kb.fact_count(), 1);

    kb.assert(st("(p a)")).unwrap();
    assert_eq!(kb.fact_count(), 1);
    let stored = kb.get_fact(&Fact::new(st("(p a)"))).unwrap();
    assert!(stored.asserted);
    assert!(stored.supported_by.is_empty());
}

#[test]
fn test_forward_chaining_either_order() {
    let orders = [
        [item("rule: ((p ?x)) -> (q ?x)"), item("fact: (p a)")],
        [item("fact: (p a)"), item("rule: ((p ?x)) -> (q ?x)")],
    ];

    for order in orders {
        let mut kb = kb();
        let mut fact_id = None;
        let mut rule_id = None;
        for entry in order {
            match kb.assert(entry).unwrap() {
                ItemId::Fact(id) => fact_id = Some(id),
                ItemId::Rule(id) => rule_id = Some(id),
            }
        }

        let answers = kb.ask(st("(q a)")).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(0).unwrap().bindings, Bindings::new());

        let q = kb.get_fact(&Fact::new(st("(q a)"))).unwrap();
        assert!(!q.asserted);
        assert_eq!(
            q.supported_by,
            vec![Support::new(fact_id.unwrap(), rule_id.unwrap())]
        );
    }
}

#[test]
fn test_chained_derivation_any_order() {
    let items = vec![
        item("fact: (p a)"),
        item("rule: ((p ?x)) -> (q ?x)"),
        item("rule: ((q ?x)) -> (r ?x)"),
    ];

    for order in permutations(&items) {
        let mut kb = kb();
        for entry in order {
            kb.assert(entry).unwrap();
        }
        let answers = kb.ask(st("(r a)")).unwrap();
        assert_eq!(answers.len(), 1, "(r a) should be derived:\n{}", kb);
    }
}

#[test]
fn test_multi_antecedent_join_is_order_independent() {
    let items = vec![
        item("rule: ((p ?x) (s ?x ?y)) -> (t ?y)"),
        item("fact: (p a)"),
        item("fact: (s a b)"),
    ];

    let mut states = Vec::new();
    for order in permutations(&items) {
        let mut kb = kb();
        for entry in order {
            kb.assert(entry).unwrap();
        }
        assert_eq!(kb.ask(st("(t b)")).unwrap().len(), 1);
        states.push(contents(&kb));
    }

    let expected = vec![
        "fact: (p a)".to_string(),
        "fact: (s a b)".to_string(),
        "fact: (t b)".to_string(),
        "rule: ((p ?x), (s ?x ?y)) -> (t ?y)".to_string(),
        "rule: ((s a ?y)) -> (t ?y)".to_string(),
    ];
    for state in states {
        assert_eq!(state, expected);
    }
}

#[test]
fn test_join_variable_must_agree() {
    let mut kb = kb();
    kb.assert(item("rule: ((p ?x) (s ?x ?y)) -> (t ?y)")).unwrap();
    kb.assert(item("fact: (p a)")).unwrap();
    kb.assert(item("fact: (s c b)")).unwrap();

    assert!(kb.ask(st("(t b)")).unwrap().is_empty());
}

#[test]
fn test_ask_with_variables_in_storage_order() {
    let mut kb = kb();
    kb.assert(st("(isa cube block)")).unwrap();
    kb.assert(st("(isa sphere ball)")).unwrap();
    kb.assert(st("(isa pyramid block)")).unwrap();

    let answers = kb.ask(st("(isa ?x block)")).unwrap();
    let found: Vec<String> = answers.bindings().map(|b| b.to_string()).collect();
    assert_eq!(found, vec!["?x : cube", "?x : pyramid"]);

    let first = answers.get(0).unwrap();
    assert_eq!(first.facts, vec![Fact::new(st("(isa cube block)"))]);
    assert_eq!(first.bindings.get("x"), Some(&Term::constant("cube")));
}

#[test]
fn test_ask_without_match_is_empty() {
    let mut kb = kb();
    kb.assert(st("(isa cube block)")).unwrap();
    let answers = kb.ask(st("(isa cube ball)")).unwrap();
    assert!(answers.is_empty());
    assert_eq!(answers.to_string(), "");
}

#[test]
fn test_rule_shaped_query_is_invalid() {
    let kb = kb();
    let result = kb.ask(item("rule: ((p ?x)) -> (q ?x)"));
    assert!(matches!(result, Err(KbError::InvalidQuery(_))));
}

#[test]
fn test_rederivation_appends_justification() {
    let mut kb = kb();
    kb.assert(item("rule: ((p ?x)) -> (q ?x)")).unwrap();
    kb.assert(item("rule: ((r ?x)) -> (q ?x)")).unwrap();
    kb.assert(item("fact: (p a)")).unwrap();
    kb.assert(item("fact: (r a)")).unwrap();

    assert_eq!(kb.fact_count(), 3);
    let q = kb.get_fact(&Fact::new(st("(q a)"))).unwrap();
    assert_eq!(q.supported_by.len(), 2);
}

#[test]
fn test_display_answers() {
    let mut kb = kb();
    kb.assert(st("(on a b)")).unwrap();
    kb.assert(st("(on c d)")).unwrap();

    let answers = kb.ask(st("(on ?x ?y)")).unwrap();
    assert_eq!(answers.to_string(), "?x : a, ?y : b\n?x : c, ?y : d\n");
    assert_eq!(kb.ask(st("(on a b)")).unwrap().to_string(), "TRUE\n");
}
