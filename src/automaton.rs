use std::collections::{btree_map, BTreeMap, BTreeSet, VecDeque};
use std::{fmt, str};

use log::trace;

use crate::error::{Error, Result};

/// A state label. Labels are compared by exact string equality.
pub type State = String;
/// An alphabet symbol; a single character in practice, but any string works.
pub type Symbol = String;

/// The transition relation: `(state, symbol) -> set of states`.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Transitions {
    map: BTreeMap<State, BTreeMap<Symbol, BTreeSet<State>>>,
}

impl Transitions {
    pub fn new() -> Transitions {
        Transitions { map: BTreeMap::new() }
    }

    /// Parses newline-separated `from,symbol,to` records. Blank lines are
    /// skipped, fields are trimmed, and repeated `(from, symbol)` pairs have
    /// their targets unioned.
    pub fn parse(text: &str) -> Result<Transitions> {
        let mut result = Transitions::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match fields[..] {
                [from, symbol, to] if !from.is_empty() && !symbol.is_empty() && !to.is_empty() => {
                    result.insert(from, symbol, to);
                }
                _ => {
                    return Err(Error::MalformedTransition {
                        line: number + 1,
                        text: line.to_string(),
                    })
                }
            }
        }
        Ok(result)
    }

    /// Adds `from --symbol--> to`. Returns false if it was already present.
    pub fn insert(&mut self, from: &str, symbol: &str, to: &str) -> bool {
        self.map
            .entry(from.to_string())
            .or_default()
            .entry(symbol.to_string())
            .or_default()
            .insert(to.to_string())
    }

    pub fn targets(&self, from: &str, symbol: &str) -> Option<&BTreeSet<State>> {
        self.map.get(from).and_then(|by_symbol| by_symbol.get(symbol))
    }

    /// The single target of `(from, symbol)`, if any. On a nondeterministic
    /// pair this is the smallest target.
    pub fn target(&self, from: &str, symbol: &str) -> Option<&State> {
        self.targets(from, symbol).and_then(|t| t.iter().next())
    }

    /// Iterates `(from, symbol, targets)` in sorted order.
    pub fn edges(&self) -> Edges {
        Edges {
            outer: self.map.iter(),
            inner: None,
        }
    }

    /// Iterates every `(from, symbol, to)` triple in sorted order.
    pub fn triples(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> {
        self.edges()
            .flat_map(|(from, symbol, to)| to.iter().map(move |to| (from, symbol, to)))
    }

    pub fn is_deterministic(&self) -> bool {
        self.edges().all(|(_, _, to)| to.len() <= 1)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The number of `(from, symbol, to)` triples.
    pub fn len(&self) -> usize {
        self.edges().map(|(_, _, to)| to.len()).sum()
    }
}

impl str::FromStr for Transitions {
    type Err = Error;
    fn from_str(s: &str) -> Result<Transitions> {
        Transitions::parse(s)
    }
}

pub struct Edges<'a> {
    outer: btree_map::Iter<'a, State, BTreeMap<Symbol, BTreeSet<State>>>,
    inner: Option<(&'a State, btree_map::Iter<'a, Symbol, BTreeSet<State>>)>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = (&'a State, &'a Symbol, &'a BTreeSet<State>);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((from, it)) = self.inner.as_mut() {
                if let Some((symbol, to)) = it.next() {
                    return Some((*from, symbol, to));
                }
            }
            let (from, by_symbol) = self.outer.next()?;
            self.inner = Some((from, by_symbol.iter()));
        }
    }
}

/// A finite automaton, deterministic or not.
///
/// Values are immutable once built; every transformation returns a new
/// automaton with its own transition table.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Automaton {
    name: String,
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    start: State,
    accept: BTreeSet<State>,
    transitions: Transitions,
}

impl Automaton {
    /// Builds an automaton, checking that the start state and every accept
    /// state are among `states`.
    ///
    /// Transitions are not checked. States they mention beyond `states` are
    /// treated as ordinary non-accepting states (see [`Automaton::labels`]),
    /// and triples on symbols outside `alphabet` never fire.
    pub fn new<S, A, F>(
        name: &str,
        states: S,
        alphabet: A,
        start: &str,
        accept: F,
        transitions: Transitions,
    ) -> Result<Automaton>
    where
        S: IntoIterator,
        S::Item: Into<State>,
        A: IntoIterator,
        A::Item: Into<Symbol>,
        F: IntoIterator,
        F::Item: Into<State>,
    {
        let states: BTreeSet<State> = states.into_iter().map(Into::into).collect();
        let accept: BTreeSet<State> = accept.into_iter().map(Into::into).collect();
        if !states.contains(start) {
            return Err(Error::UnknownState {
                role: "start",
                state: start.to_string(),
            });
        }
        if let Some(state) = accept.iter().find(|s| !states.contains(*s)) {
            return Err(Error::UnknownState {
                role: "accept",
                state: state.clone(),
            });
        }
        Ok(Automaton::from_parts(
            name.to_string(),
            states,
            alphabet.into_iter().map(Into::into).collect(),
            start.to_string(),
            accept,
            transitions,
        ))
    }

    /// Assembles an automaton whose invariants the caller already guarantees.
    pub(crate) fn from_parts(
        name: String,
        states: BTreeSet<State>,
        alphabet: BTreeSet<Symbol>,
        start: State,
        accept: BTreeSet<State>,
        transitions: Transitions,
    ) -> Automaton {
        Automaton {
            name,
            states,
            alphabet,
            start,
            accept,
            transitions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn start(&self) -> &State {
        &self.start
    }

    pub fn accept(&self) -> &BTreeSet<State> {
        &self.accept
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept.contains(state)
    }

    /// True iff no `(state, symbol)` pair has more than one target.
    pub fn is_deterministic(&self) -> bool {
        self.transitions.is_deterministic()
    }

    /// The transitions in the newline-record text form accepted by
    /// [`Transitions::parse`].
    pub fn transition_text(&self) -> String {
        self.transitions
            .triples()
            .map(|(from, symbol, to)| format!("{},{},{}", from, symbol, to))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every state label the automaton mentions: the declared states, then
    /// the start state, then transition endpoints, each once.
    ///
    /// Transitions may run through undeclared states; the simulator follows
    /// them, so every other algorithm has to see them too.
    pub fn labels(&self) -> Vec<&State> {
        let mut seen = BTreeSet::new();
        self.states
            .iter()
            .chain(Some(&self.start))
            .chain(self.transitions.triples().flat_map(|(from, _, to)| [from, to]))
            .filter(|s| seen.insert(s.as_str()))
            .collect()
    }

    /// The `(from, symbol, to)` triples whose symbol is in the alphabet.
    /// Transitions on any other symbol can never fire.
    pub fn usable_triples(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> {
        self.transitions
            .triples()
            .filter(move |(_, symbol, _)| self.alphabet.contains(*symbol))
    }

    /// States reachable from the start state.
    pub fn reachable_states(&self) -> BTreeSet<State> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.start.clone());
        queue.push_back(&self.start);
        while let Some(state) = queue.pop_front() {
            for symbol in &self.alphabet {
                for next in self.transitions.targets(state, symbol).into_iter().flatten() {
                    if seen.insert(next.clone()) {
                        trace!("reachable: {} --{}--> {}", state, symbol, next);
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// A copy of this automaton without the states that cannot be reached
    /// from the start state.
    pub fn trim(&self) -> Automaton {
        let reachable = self.reachable_states();
        let mut transitions = Transitions::new();
        for (from, symbol, to) in self.transitions.triples() {
            if reachable.contains(from) {
                transitions.insert(from, symbol, to);
            }
        }
        Automaton::from_parts(
            self.name.clone(),
            self.states.intersection(&reachable).cloned().collect(),
            self.alphabet.clone(),
            self.start.clone(),
            self.accept.intersection(&reachable).cloned().collect(),
            transitions,
        )
    }
}

fn join<'a, I: IntoIterator<Item = &'a String>>(items: I) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Automaton: {}", self.name)?;
        writeln!(f, "States: {{{}}}", join(&self.states))?;
        writeln!(f, "Alphabet: {{{}}}", join(&self.alphabet))?;
        writeln!(f, "Start State: {}", self.start)?;
        writeln!(f, "Accept States: {{{}}}", join(&self.accept))?;
        writeln!(f, "Transitions:")?;
        for (from, symbol, to) in self.transitions.triples() {
            writeln!(f, " {} --> {} --> {}", from, symbol, to)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parity() -> Automaton {
        let transitions = Transitions::parse("q0,0,q0\nq0,1,q1\nq1,0,q1\nq1,1,q0").unwrap();
        Automaton::new("parity", ["q0", "q1"], ["0", "1"], "q0", ["q1"], transitions).unwrap()
    }

    #[test]
    fn test_parse_transitions() {
        let t = Transitions::parse("  A , a , A \n\nA,a,B\nB,b,C\n   \nA,a,B").unwrap();
        assert_eq!(t.len(), 3);
        let targets: Vec<_> = t.targets("A", "a").unwrap().iter().cloned().collect();
        assert_eq!(targets, vec!["A".to_string(), "B".to_string()]);
        assert!(!t.is_deterministic());
        assert!(t.targets("C", "a").is_none());
    }

    #[test]
    fn test_parse_transitions_error() {
        match Transitions::parse("A,a,B\nA,b") {
            Err(Error::MalformedTransition { line, text }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "A,b");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!("A,a,B,C".parse::<Transitions>().is_err());
        assert!("A,,B".parse::<Transitions>().is_err());
        assert!("".parse::<Transitions>().unwrap().is_empty());
    }

    #[test]
    fn test_new_checks_states() {
        let t = Transitions::new();
        assert!(matches!(
            Automaton::new("x", ["a"], ["0"], "b", ["a"], t.clone()),
            Err(Error::UnknownState { role: "start", .. })
        ));
        assert!(matches!(
            Automaton::new("x", ["a"], ["0"], "a", ["z"], t),
            Err(Error::UnknownState { role: "accept", .. })
        ));
    }

    #[test]
    fn test_render() {
        let rendered = parity().to_string();
        assert_eq!(
            rendered,
            "Automaton: parity\n\
             States: {q0, q1}\n\
             Alphabet: {0, 1}\n\
             Start State: q0\n\
             Accept States: {q1}\n\
             Transitions:\n \
             q0 --> 0 --> q0\n \
             q0 --> 1 --> q1\n \
             q1 --> 0 --> q1\n \
             q1 --> 1 --> q0\n"
        );
    }

    #[test]
    fn test_transition_text_reparses() {
        let a = parity();
        assert_eq!(Transitions::parse(&a.transition_text()).unwrap(), *a.transitions());
    }

    #[test]
    fn test_labels_and_usable_triples() {
        let t = Transitions::parse("A,a,D\nD,a,B\nA,c,B").unwrap();
        let a = Automaton::new("x", ["B", "A"], ["a"], "A", ["B"], t).unwrap();
        let labels: Vec<&str> = a.labels().into_iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["A", "B", "D"]);
        let symbols: Vec<&str> = a.usable_triples().map(|(_, s, _)| s.as_str()).collect();
        assert_eq!(symbols, vec!["a", "a"]);
    }

    #[test]
    fn test_trim() {
        let t = Transitions::parse("s,a,t\nu,a,s\nu,b,u").unwrap();
        let a = Automaton::new("x", ["s", "t", "u"], ["a", "b"], "s", ["t", "u"], t).unwrap();
        let trimmed = a.trim();
        assert_eq!(trimmed.states().len(), 2);
        assert!(!trimmed.states().contains("u"));
        assert!(!trimmed.is_accepting("u"));
        assert_eq!(trimmed.transitions().len(), 1);
    }
}
