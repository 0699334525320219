//! Regular expressions from automata by state elimination.

use std::collections::BTreeMap;
use std::mem;

use log::{debug, trace};

use crate::automaton::Automaton;
use crate::determinize::determinize;
use crate::regex::Regex::*;
use crate::regex::{Normalize, Regex};

/// A regular expression for the language of `automaton`.
///
/// Nondeterministic inputs are determinized first. States are eliminated
/// in sorted label order.
pub fn to_regex(automaton: &Automaton) -> Regex {
    let dfa = determinize(automaton);
    eliminate(&dfa)
}

/// [`to_regex`], rendered.
pub fn to_regex_string(automaton: &Automaton) -> String {
    to_regex(automaton).to_string()
}

fn eliminate(dfa: &Automaton) -> Regex {
    let states: Vec<&str> = dfa.labels().into_iter().map(String::as_str).collect();
    let n = states.len();
    let position: BTreeMap<&str, usize> = states.iter().enumerate().map(|(i, &s)| (s, i)).collect();
    let (virtual_start, virtual_final) = (n, n + 1);
    let total = n + 2;

    // Parallel edges between the same pair of states become one alternation.
    let mut edges = vec![vec![Vec::new(); total]; total];
    for (from, symbol, to) in dfa.usable_triples() {
        edges[position[from.as_str()]][position[to.as_str()]].push(Regex::literal(symbol));
    }
    let mut r: Vec<Vec<Regex>> = edges
        .into_iter()
        .map(|row| row.into_iter().map(|cell| Alt(cell).normalize()).collect())
        .collect();

    r[virtual_start][position[dfa.start().as_str()]] = Empty;
    for state in dfa.accept() {
        if let Some(&i) = position.get(state.as_str()) {
            r[i][virtual_final] = Empty;
        }
    }

    for k in 0..n {
        let through = Kleene(Box::new(r[k][k].clone())).normalize();
        for i in 0..total {
            if i == k || r[i][k] == Null {
                continue;
            }
            for j in 0..total {
                if j == k || r[k][j] == Null {
                    continue;
                }
                let path = Cat(vec![r[i][k].clone(), through.clone(), r[k][j].clone()]);
                let direct = mem::replace(&mut r[i][j], Null);
                r[i][j] = Alt(vec![direct, path]).normalize();
                trace!("eliminating {}: R[{}][{}] = {}", states[k], i, j, r[i][j]);
            }
        }
        for x in 0..total {
            r[x][k] = Null;
            r[k][x] = Null;
        }
        debug!("{}: eliminated {} ({}/{})", dfa.name(), states[k], k + 1, n);
    }

    mem::replace(&mut r[virtual_start][virtual_final], Null).simplify()
}
