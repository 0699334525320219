use std::{error, fmt, result};

/// Errors produced while building or transforming automata.
#[derive(Debug)]
pub enum Error {
    /// A required field of a raw automaton was missing or empty.
    MissingField(&'static str),
    /// The start state or an accept state is not one of the automaton's states.
    UnknownState { role: &'static str, state: String },
    /// A transition record did not have exactly three non-empty fields.
    MalformedTransition { line: usize, text: String },
    /// Minimization was asked of a nondeterministic automaton.
    NotDeterministic,
    /// A record could not be (de)serialized.
    Json(serde_json::Error),
}

pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MissingField(field) => write!(f, "missing required field `{}`", field),
            Error::UnknownState { role, ref state } => {
                write!(f, "{} state `{}` is not in the state set", role, state)
            }
            Error::MalformedTransition { line, ref text } => write!(
                f,
                "line {}: expected `from,symbol,to`, got `{}`",
                line, text
            ),
            Error::NotDeterministic => f.write_str("can only minimize deterministic automata"),
            Error::Json(ref e) => write!(f, "bad automaton record: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Json(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}
