//! Moore-style partition refinement.

use std::collections::{BTreeMap, BTreeSet};

use bit_set::BitSet;
use log::debug;

use crate::automaton::{Automaton, State, Transitions};
use crate::error::{Error, Result};

/// A state's behavior relative to the current partition: for each symbol
/// in alphabet order, the block its successor lies in.
type Signature = Vec<Option<usize>>;

/// Merges equivalent states of a DFA.
///
/// States are not pruned for reachability first; unreachable states take
/// part in the partition like any other. Call [`Automaton::trim`] beforehand
/// for a textbook-minimal result.
pub fn minimize(dfa: &Automaton) -> Result<Automaton> {
    if !dfa.is_deterministic() {
        return Err(Error::NotDeterministic);
    }

    // Undeclared states reached by transitions are partitioned too.
    let states: Vec<&State> = dfa.labels();
    let position: BTreeMap<&str, usize> = states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let accepting: BitSet = (0..states.len())
        .filter(|&i| dfa.is_accepting(states[i]))
        .collect();

    // Successor index of every state on every symbol; `None` for a missing
    // transition.
    let successors: Vec<Vec<Option<usize>>> = states
        .iter()
        .map(|s| {
            dfa.alphabet()
                .iter()
                .map(|symbol| {
                    dfa.transitions()
                        .target(s, symbol)
                        .and_then(|t| position.get(t.as_str()).copied())
                })
                .collect()
        })
        .collect();

    let (acc, rest): (Vec<usize>, Vec<usize>) =
        (0..states.len()).partition(|&i| accepting.contains(i));
    let mut blocks: Vec<Vec<usize>> = vec![acc, rest];
    blocks.retain(|b| !b.is_empty());

    let mut pass = 0;
    loop {
        pass += 1;
        let block_of = assignment(&blocks, states.len());
        let mut changed = false;
        let mut refined = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let mut groups: BTreeMap<Signature, Vec<usize>> = BTreeMap::new();
            for &state in block {
                let signature = successors[state]
                    .iter()
                    .map(|t| t.map(|t| block_of[t]))
                    .collect();
                groups.entry(signature).or_default().push(state);
            }
            if groups.len() > 1 {
                changed = true;
            }
            refined.extend(groups.into_values());
        }
        blocks = refined;
        debug!("{}: refinement pass {} -> {} blocks", dfa.name(), pass, blocks.len());
        if !changed {
            break;
        }
    }

    let block_of = assignment(&blocks, states.len());
    let label = |state: usize| format!("S{}", block_of[state]);

    let mut accept = BTreeSet::new();
    for (i, block) in blocks.iter().enumerate() {
        if block.iter().any(|&s| accepting.contains(s)) {
            accept.insert(format!("S{}", i));
        }
    }

    let mut transitions = Transitions::new();
    for (from, symbol, to) in dfa.usable_triples() {
        let (from, to) = (position[from.as_str()], position[to.as_str()]);
        transitions.insert(&label(from), symbol, &label(to));
    }

    Ok(Automaton::from_parts(
        format!("{}_MIN", dfa.name()),
        (0..blocks.len()).map(|i| format!("S{}", i)).collect(),
        dfa.alphabet().clone(),
        label(position[dfa.start().as_str()]),
        accept,
        transitions,
    ))
}

fn assignment(blocks: &[Vec<usize>], len: usize) -> Vec<usize> {
    let mut block_of = vec![0; len];
    for (i, block) in blocks.iter().enumerate() {
        for &state in block {
            block_of[state] = i;
        }
    }
    block_of
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::accepts;

    fn build(states: &[&str], accept: &[&str], t: &str) -> Automaton {
        let t = Transitions::parse(t).unwrap();
        Automaton::new("m", states.iter().copied(), ["a", "b"], states[0], accept.iter().copied(), t).unwrap()
    }

    #[test]
    fn test_rejects_nfa() {
        let a = build(&["p", "q"], &["q"], "p,a,p\np,a,q");
        assert!(matches!(minimize(&a), Err(Error::NotDeterministic)));
    }

    #[test]
    fn test_merges_equivalent_states() {
        // q1 and q2 both accept and loop to each other on `a`.
        let a = build(&["q0", "q1", "q2"], &["q1", "q2"], "q0,a,q1\nq1,a,q2\nq2,a,q1");
        let m = minimize(&a).unwrap();
        assert_eq!(m.name(), "m_MIN");
        assert_eq!(m.states().len(), 2);
        assert_eq!(m.accept().len(), 1);
        assert!(m.is_deterministic());
        for input in ["", "a", "aa", "aaa", "b", "ab"] {
            assert_eq!(accepts(&a, input), accepts(&m, input), "input {:?}", input);
        }
    }

    #[test]
    fn test_missing_transition_splits() {
        // p and q are both non-accepting but only p can reach r.
        let a = build(&["p", "q", "r"], &["r"], "p,a,r\nq,b,q");
        let m = minimize(&a).unwrap();
        assert_eq!(m.states().len(), 3);
    }

    #[test]
    fn test_unreachable_states_kept() {
        // `u` is unreachable and distinguishable, so it survives as a block.
        let a = build(&["s", "t", "u"], &["t"], "s,a,t\nt,a,t\nu,b,u");
        assert_eq!(minimize(&a).unwrap().states().len(), 3);
        assert_eq!(minimize(&a.trim()).unwrap().states().len(), 2);
    }

    #[test]
    fn test_undeclared_states_are_partitioned() {
        let t = Transitions::parse("A,a,D\nD,a,B").unwrap();
        let a = Automaton::new("u", ["A", "B"], ["a"], "A", ["B"], t).unwrap();
        let m = minimize(&a).unwrap();
        assert_eq!(m.states().len(), 3);
        assert!(accepts(&m, "aa"));
        assert!(!accepts(&m, "a"));
    }

    #[test]
    fn test_out_of_alphabet_transitions_dropped() {
        // p and q merge; they disagree only on `c`, which can never fire.
        let t = Transitions::parse("p,a,p\nq,a,q\np,c,p\nq,c,r\nr,a,r").unwrap();
        let a = Automaton::new("c", ["p", "q", "r"], ["a"], "p", ["p", "q"], t).unwrap();
        assert!(a.is_deterministic());
        let m = minimize(&a).unwrap();
        assert!(m.is_deterministic());
        assert_eq!(m.states().len(), 2);
        assert!(m.transitions().triples().all(|(_, symbol, _)| symbol == "a"));
        assert!(!accepts(&m, "c"));
        assert!(accepts(&m, "aa"));
    }

    #[test]
    fn test_idempotent() {
        let a = build(
            &["0", "1", "2", "3"],
            &["1", "3"],
            "0,a,1\n0,b,2\n1,a,1\n1,b,2\n2,a,3\n2,b,0\n3,a,3\n3,b,0",
        );
        let once = minimize(&a).unwrap();
        let twice = minimize(&once).unwrap();
        assert_eq!(once.states().len(), 2);
        assert_eq!(once.states().len(), twice.states().len());
    }
}
