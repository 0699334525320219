//! Subset construction.

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, trace};

use crate::automaton::{Automaton, State, Transitions};
use crate::stateset::StateSet;

/// Sets of source states waiting to become DFA states, with the label each
/// one was given when first seen.
struct Worklist {
    labels: BTreeMap<StateSet, State>,
    used: BTreeSet<State>,
    queue: VecDeque<StateSet>,
}

impl Worklist {
    /// The label of `set`, registering and enqueueing it on first sight.
    fn index(&mut self, set: StateSet) -> State {
        match self.labels.entry(set) {
            Entry::Occupied(view) => view.get().clone(),
            Entry::Vacant(view) => {
                let mut label = view.key().label();
                while self.used.contains(&label) {
                    label.push('\'');
                }
                self.used.insert(label.clone());
                self.queue.push_back(view.key().clone());
                view.insert(label).clone()
            }
        }
    }
}

/// Returns a DFA recognizing the same language as `nfa`.
///
/// A deterministic input is returned as is. Otherwise the result is a
/// partial DFA: subsets with no successor on a symbol get no transition
/// rather than an explicit dead state.
pub fn determinize(nfa: &Automaton) -> Cow<Automaton> {
    if nfa.is_deterministic() {
        Cow::Borrowed(nfa)
    } else {
        Cow::Owned(subset_construction(nfa))
    }
}

fn subset_construction(nfa: &Automaton) -> Automaton {
    let mut worklist = Worklist {
        labels: BTreeMap::new(),
        used: BTreeSet::new(),
        queue: VecDeque::new(),
    };
    let start = worklist.index(StateSet::singleton(nfa.start()));

    let mut states = BTreeSet::new();
    let mut accept = BTreeSet::new();
    let mut transitions = Transitions::new();

    while let Some(set) = worklist.queue.pop_front() {
        let label = worklist.labels[&set].clone();
        if set.iter().any(|s| nfa.is_accepting(s)) {
            accept.insert(label.clone());
        }
        for symbol in nfa.alphabet() {
            let next: StateSet = set
                .iter()
                .filter_map(|s| nfa.transitions().targets(s, symbol))
                .flatten()
                .cloned()
                .collect();
            if next.is_empty() {
                continue;
            }
            let next_label = worklist.index(next);
            trace!("{} --{}--> {}", label, symbol, next_label);
            transitions.insert(&label, symbol, &next_label);
        }
        states.insert(label);
    }

    debug!(
        "determinized {}: {} states -> {} states",
        nfa.name(),
        nfa.states().len(),
        states.len()
    );

    Automaton::from_parts(
        format!("{}_DFA", nfa.name()),
        states,
        nfa.alphabet().clone(),
        start,
        accept,
        transitions,
    )
}
