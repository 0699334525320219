//! Acceptance by multi-state simulation.
//!
//! A DFA is just the case where the current state set never grows past one
//! element, so the same loop serves both kinds of automata.

use std::collections::BTreeMap;

use bit_set::BitSet;
use log::trace;

use crate::automaton::Automaton;

/// An automaton compiled into an index-based transition table.
pub struct Simulator<'a> {
    automaton: &'a Automaton,
    start: usize,
    accepting: BitSet,
    /// For each symbol, the successors of every state index.
    table: BTreeMap<&'a str, Vec<BitSet>>,
}

impl<'a> Simulator<'a> {
    pub fn new(automaton: &'a Automaton) -> Simulator<'a> {
        let index: BTreeMap<&'a str, usize> = automaton
            .labels()
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        let mut table: BTreeMap<&'a str, Vec<BitSet>> = BTreeMap::new();
        for (from, symbol, to) in automaton.usable_triples() {
            let row = table
                .entry(symbol.as_str())
                .or_insert_with(|| vec![BitSet::new(); index.len()]);
            row[index[from.as_str()]].insert(index[to.as_str()]);
        }

        Simulator {
            automaton,
            start: index[automaton.start().as_str()],
            accepting: automaton
                .accept()
                .iter()
                .filter_map(|s| index.get(s.as_str()).copied())
                .collect(),
            table,
        }
    }

    /// Runs a sequence of symbols. A symbol outside the alphabet rejects.
    pub fn run<'s, I: IntoIterator<Item = &'s str>>(&self, symbols: I) -> bool {
        let mut current = BitSet::new();
        current.insert(self.start);
        for symbol in symbols {
            if !self.automaton.alphabet().contains(symbol) {
                trace!("{}: `{}` is not in the alphabet", self.automaton.name(), symbol);
                return false;
            }
            let mut next = BitSet::new();
            if let Some(row) = self.table.get(symbol) {
                for state in current.iter() {
                    next.union_with(&row[state]);
                }
            }
            if next.is_empty() {
                // Nothing can leave the empty set.
                return false;
            }
            current = next;
        }
        !current.is_disjoint(&self.accepting)
    }
}

/// Whether `automaton` accepts `input`, reading each `char` as one symbol.
pub fn accepts(automaton: &Automaton, input: &str) -> bool {
    let symbols: Vec<String> = input.chars().map(String::from).collect();
    accepts_symbols(automaton, symbols.iter().map(String::as_str))
}

/// Whether `automaton` accepts the given sequence of symbols.
pub fn accepts_symbols<'s, I: IntoIterator<Item = &'s str>>(automaton: &Automaton, symbols: I) -> bool {
    Simulator::new(automaton).run(symbols)
}
