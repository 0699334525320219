//! Brzozowski derivatives: matching strings against a [`Regex`] and
//! compiling one into a DFA.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;

use crate::automaton::{Automaton, State, Symbol, Transitions};
use crate::regex::Regex;
use crate::regex::Regex::*;

pub trait Differentiable: Sized {
    /// The expression matching `w` iff `self` matches `symbol` followed by `w`.
    fn derivative(&self, symbol: &str) -> Self;
}

impl Differentiable for Regex {
    fn derivative(&self, symbol: &str) -> Regex {
        match *self {
            Null | Empty => Null,
            Literal(ref s) => {
                if s == symbol {
                    Empty
                } else {
                    Null
                }
            }
            Alt(ref xs) => Alt(xs.iter().map(|x| x.derivative(symbol)).collect()),
            Cat(ref xs) => {
                let mut ds = Vec::new();
                for i in 0..xs.len() {
                    let mut v = vec![xs[i].derivative(symbol)];
                    v.extend_from_slice(&xs[i + 1..]);
                    ds.push(Cat(v));
                    if !xs[i].nullable() {
                        break;
                    }
                }
                Alt(ds)
            }
            Kleene(ref x) => Cat(vec![x.derivative(symbol), Kleene(x.clone())]),
        }
    }
}

impl Regex {
    /// Whether the expression matches the given sequence of symbols.
    pub fn matches<'s, I: IntoIterator<Item = &'s str>>(&self, symbols: I) -> bool {
        let mut current = self.clone().simplify();
        for symbol in symbols {
            if current == Null {
                return false;
            }
            current = current.derivative(symbol).simplify();
        }
        current.nullable()
    }

    /// Like [`Regex::matches`], reading each `char` of `input` as a symbol.
    pub fn is_match(&self, input: &str) -> bool {
        let symbols: Vec<String> = input.chars().map(String::from).collect();
        self.matches(symbols.iter().map(String::as_str))
    }
}

impl Automaton {
    /// Builds a DFA over `alphabet` whose states are the distinct simplified
    /// derivatives of `regex`.
    ///
    /// Derivatives equal to the null set get no state, so the result is
    /// partial in the same way subset construction's is.
    pub fn from_regex<A>(name: &str, regex: &Regex, alphabet: A) -> Automaton
    where
        A: IntoIterator,
        A::Item: Into<Symbol>,
    {
        fn index(worklist: &mut (BTreeMap<Regex, State>, VecDeque<Regex>), re: Regex) -> State {
            let next = format!("q{}", worklist.0.len());
            match worklist.0.entry(re) {
                Entry::Vacant(view) => {
                    worklist.1.push_back(view.key().clone());
                    view.insert(next).clone()
                }
                Entry::Occupied(view) => view.get().clone(),
            }
        }

        let alphabet: BTreeSet<Symbol> = alphabet.into_iter().map(Into::into).collect();
        let mut worklist = (BTreeMap::new(), VecDeque::new());
        let start = index(&mut worklist, regex.clone().simplify());

        let mut states = BTreeSet::new();
        let mut accept = BTreeSet::new();
        let mut transitions = Transitions::new();
        while let Some(re) = worklist.1.pop_front() {
            let label = worklist.0[&re].clone();
            if re.nullable() {
                accept.insert(label.clone());
            }
            for symbol in &alphabet {
                let d = re.derivative(symbol).simplify();
                if d == Null {
                    continue;
                }
                let target = index(&mut worklist, d);
                transitions.insert(&label, symbol, &target);
            }
            states.insert(label);
        }
        debug!("{}: {} derivative states", name, states.len());

        Automaton::from_parts(name.to_string(), states, alphabet, start, accept, transitions)
    }
}
