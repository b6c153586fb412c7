//! Query answers

use super::item::Fact;
use crate::logic::Bindings;
use std::fmt;

/// One way a query was satisfied
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub bindings: Bindings,
    /// Facts the answer was matched against
    pub facts: Vec<Fact>,
}

/// All answers to a query, in the order they were found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    answers: Vec<Answer>,
}

impl BindingSet {
    pub fn new() -> Self {
        BindingSet {
            answers: Vec::new(),
        }
    }

    pub fn push(&mut self, bindings: Bindings, facts: Vec<Fact>) {
        self.answers.push(Answer { bindings, facts });
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Answer> {
        self.answers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    /// Just the bindings, in discovery order
    pub fn bindings(&self) -> impl Iterator<Item = &Bindings> {
        self.answers.iter().map(|answer| &answer.bindings)
    }
}

impl<'a> IntoIterator for &'a BindingSet {
    type Item = &'a Answer;
    type IntoIter = std::slice::Iter<'a, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.iter()
    }
}

impl IntoIterator for BindingSet {
    type Item = Answer;
    type IntoIter = std::vec::IntoIter<Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.into_iter()
    }
}

impl fmt::Display for BindingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for answer in &self.answers {
            if answer.bindings.is_empty() {
                writeln!(f, "TRUE")?;
            } else {
                writeln!(f, "{}", answer.bindings)?;
            }
        }
        Ok(())
    }
}
