//! Finite automata: acceptance, subset construction, minimization, and
//! conversion to regular expressions by state elimination.

pub use automaton::{Automaton, State, Symbol, Transitions};
pub use determinize::determinize;
pub use eliminate::{to_regex, to_regex_string};
pub use error::{Error, Result};
pub use minimize::minimize;
pub use regex::Regex;
pub use simulate::{accepts, accepts_symbols, Simulator};
pub use stateset::StateSet;

pub mod automaton;
pub mod derivatives;
pub mod determinize;
pub mod eliminate;
pub mod error;
pub mod minimize;
pub mod record;
pub mod regex;
pub mod simulate;
pub mod stateset;
