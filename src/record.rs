//! The persisted form of automata, as read and written by import/export.
//!
//! Transitions may arrive as the newline-record text, as a list of
//! `["from,symbol", [targets...]]` pairs, or as an object keyed by
//! `"from,symbol"`. Every form is turned back into text and parsed, so
//! construction has a single entry point.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, State, Symbol, Transitions};
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TransitionsRecord {
    Text(String),
    Pairs(Vec<(String, Vec<State>)>),
    Map(BTreeMap<String, Vec<State>>),
}

impl TransitionsRecord {
    pub fn to_text(&self) -> String {
        fn lines<'a, I: IntoIterator<Item = (&'a String, &'a Vec<State>)>>(entries: I) -> String {
            let mut text = String::new();
            for (key, targets) in entries {
                for to in targets {
                    text.push_str(key);
                    text.push(',');
                    text.push_str(to);
                    text.push('\n');
                }
            }
            text
        }
        match *self {
            TransitionsRecord::Text(ref text) => text.clone(),
            TransitionsRecord::Pairs(ref pairs) => lines(pairs.iter().map(|(k, v)| (k, v))),
            TransitionsRecord::Map(ref map) => lines(map),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutomatonRecord {
    pub name: Option<String>,
    pub states: Option<Vec<State>>,
    pub alphabet: Option<Vec<Symbol>>,
    pub start_state: Option<State>,
    pub accept_states: Option<Vec<State>>,
    pub transitions: Option<TransitionsRecord>,
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingField(field)),
    }
}

fn labels(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

impl AutomatonRecord {
    /// Checks the record and builds the automaton it describes.
    ///
    /// `name`, `startState`, `states` and `alphabet` must be non-empty.
    /// `acceptStates` and `transitions` must be present but may be empty.
    pub fn into_automaton(&self) -> Result<Automaton> {
        let name = required("name", &self.name)?;
        let start = required("startState", &self.start_state)?;
        let states = labels(self.states.as_deref().unwrap_or_default());
        if states.is_empty() {
            return Err(Error::MissingField("states"));
        }
        let alphabet = labels(self.alphabet.as_deref().unwrap_or_default());
        if alphabet.is_empty() {
            return Err(Error::MissingField("alphabet"));
        }
        let accept = labels(self.accept_states.as_deref().ok_or(Error::MissingField("acceptStates"))?);
        let text = self
            .transitions
            .as_ref()
            .ok_or(Error::MissingField("transitions"))?
            .to_text();
        Automaton::new(name, states, alphabet, start, accept, Transitions::parse(&text)?)
    }
}

impl<'a> From<&'a Automaton> for AutomatonRecord {
    fn from(a: &'a Automaton) -> AutomatonRecord {
        AutomatonRecord {
            name: Some(a.name().to_string()),
            states: Some(a.states().iter().cloned().collect()),
            alphabet: Some(a.alphabet().iter().cloned().collect()),
            start_state: Some(a.start().clone()),
            accept_states: Some(a.accept().iter().cloned().collect()),
            transitions: Some(TransitionsRecord::Pairs(
                a.transitions()
                    .edges()
                    .map(|(from, symbol, to)| (format!("{},{}", from, symbol), to.iter().cloned().collect()))
                    .collect(),
            )),
        }
    }
}

/// Reads a JSON array of records. Each record succeeds or fails on its own;
/// only a document that is not an array fails as a whole.
pub fn import_collection(json: &str) -> Result<Vec<Result<Automaton>>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let automaton = serde_json::from_value::<AutomatonRecord>(value)
                .map_err(Error::from)
                .and_then(|record| record.into_automaton());
            if let Err(ref e) = automaton {
                warn!("automaton {}: {}", i + 1, e);
            }
            automaton
        })
        .collect())
}

/// Writes automata as a pretty-printed JSON array of records.
pub fn export_collection(automata: &[Automaton]) -> Result<String> {
    let records: Vec<AutomatonRecord> = automata.iter().map(AutomatonRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"[
        {
            "name": "text",
            "states": ["q0", "q1"],
            "alphabet": ["0", "1"],
            "startState": "q0",
            "acceptStates": ["q1"],
            "transitions": "q0,1,q1\nq1,1,q0"
        },
        {
            "name": "pairs",
            "states": ["A", "B"],
            "alphabet": ["a"],
            "startState": "A",
            "acceptStates": ["B"],
            "transitions": [["A,a", ["A", "B"]]]
        },
        {
            "name": "map",
            "states": ["A", "B"],
            "alphabet": ["a"],
            "startState": "A",
            "acceptStates": ["B"],
            "transitions": {"A,a": ["A", "B"]}
        },
        {
            "states": ["A"],
            "alphabet": ["a"],
            "startState": "A",
            "acceptStates": [],
            "transitions": ""
        },
        {
            "name": "bad",
            "states": ["A"],
            "alphabet": ["a"],
            "startState": "A",
            "acceptStates": [],
            "transitions": "A,a"
        }
    ]"#;

    #[test]
    fn test_import_forms() {
        let imported = import_collection(COLLECTION).unwrap();
        assert_eq!(imported.len(), 5);
        let text = imported[0].as_ref().unwrap();
        assert_eq!(text.transitions().len(), 2);
        let pairs = imported[1].as_ref().unwrap();
        let map = imported[2].as_ref().unwrap();
        assert!(!pairs.is_deterministic());
        assert_eq!(pairs.transitions(), map.transitions());
        assert!(matches!(imported[3], Err(Error::MissingField("name"))));
        assert!(matches!(imported[4], Err(Error::MalformedTransition { line: 1, .. })));
    }

    #[test]
    fn test_import_not_an_array() {
        assert!(matches!(import_collection(r#"{"name": "x"}"#), Err(Error::Json(_))));
    }

    #[test]
    fn test_export_reimports() {
        let t = Transitions::parse("p,a,p\np,a,q").unwrap();
        let a = Automaton::new("x", ["p", "q"], ["a"], "p", Vec::<String>::new(), t).unwrap();
        let json = export_collection(&[a.clone()]).unwrap();
        let back = import_collection(&json).unwrap().pop().unwrap().unwrap();
        assert_eq!(back, a);
    }
}
