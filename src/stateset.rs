use std::collections::{btree_set, BTreeSet};
use std::iter::FromIterator;

use crate::automaton::State;

/// A set of states of some source automaton, used as the identity of a
/// composite state during subset construction.
///
/// Equality, ordering and hashing are structural over the (sorted)
/// members, so two sets built in different orders are the same key.
#[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Debug, Clone, Default)]
pub struct StateSet(BTreeSet<State>);

impl StateSet {
    pub fn singleton(state: &str) -> StateSet {
        StateSet(Some(state.to_string()).into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.0.contains(state)
    }

    pub fn iter(&self) -> btree_set::Iter<State> {
        self.0.iter()
    }

    /// The readable name of this set: a singleton is named by its member,
    /// anything larger by its sorted members joined with `-`.
    ///
    /// Distinct sets can share a label (`{"a-b"}` and `{"a", "b"}`), so the
    /// label is only a display name; the set itself is the identity.
    pub fn label(&self) -> String {
        match self.0.len() {
            1 => self.0.iter().next().cloned().unwrap_or_default(),
            _ => self.0.iter().map(String::as_str).collect::<Vec<_>>().join("-"),
        }
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> StateSet {
        StateSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a State;
    type IntoIter = btree_set::Iter<'a, State>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
