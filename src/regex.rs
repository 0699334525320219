use std::collections::BTreeSet;
use std::iter::Peekable;
use std::{fmt, str};

use self::Regex::*;
use crate::automaton::Symbol;

/// A regular expression over an alphabet of string symbols.
#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Clone)]
pub enum Regex {
    /// The null set. This never matches anything.
    Null,
    /// The empty string (matches exactly "").
    Empty,
    /// Matches exactly one occurrence of the symbol.
    Literal(Symbol),
    /// Alternation (also known as disjunction). Matches any string matched
    /// by one of the contained regexes.
    Alt(Vec<Regex>),
    /// Concatenation. Matches iff the contained regexes match in sequence.
    Cat(Vec<Regex>),
    /// Kleene closure. Matches zero or more repetitions of the contained regex.
    Kleene(Box<Regex>),
}

/// One bottom-up simplification pass.
pub trait Normalize {
    fn normalize(self) -> Self;
}

impl Normalize for Regex {
    fn normalize(self) -> Self {
        match self {
            Null => Null,
            Empty => Empty,
            Literal(s) => Literal(s),
            Alt(xs) => {
                let mut xs: BTreeSet<_> = xs
                    .into_iter()
                    .map(Normalize::normalize)
                    .flat_map(|x| match x {
                        Alt(v) => v,
                        x => vec![x],
                    })
                    .collect();
                xs.remove(&Null);
                if xs.len() > 1 && xs.iter().any(|x| *x != Empty && x.nullable()) {
                    xs.remove(&Empty);
                }
                let mut xs: Vec<_> = xs.into_iter().collect();
                match xs.len() {
                    0 => Null,
                    1 => xs.pop().unwrap_or(Null),
                    _ => Alt(xs),
                }
            }
            Cat(xs) => {
                let mut xs: Vec<_> = xs
                    .into_iter()
                    .map(Normalize::normalize)
                    .flat_map(|x| match x {
                        Cat(v) => v,
                        x => vec![x],
                    })
                    .filter(|x| *x != Empty)
                    .collect();
                if xs.contains(&Null) {
                    return Null;
                }
                match xs.len() {
                    0 => Empty,
                    1 => xs.pop().unwrap_or(Empty),
                    _ => Cat(xs),
                }
            }
            Kleene(x) => match x.normalize() {
                Kleene(y) => Kleene(y),
                Null | Empty => Empty,
                Alt(ys) if ys.contains(&Empty) => {
                    Kleene(Box::new(Alt(ys.into_iter().filter(|y| *y != Empty).collect()))).normalize()
                }
                y => Kleene(Box::new(y)),
            },
        }
    }
}

impl Regex {
    /// Tests whether a regular expression is nullable, i.e. whether it matches
    /// the empty string.
    pub fn nullable(&self) -> bool {
        match *self {
            Null => false,
            Empty => true,
            Literal(_) => false,
            Alt(ref xs) => xs.iter().any(Regex::nullable),
            Cat(ref xs) => xs.iter().all(Regex::nullable),
            Kleene(_) => true,
        }
    }

    /// Normalizes until nothing changes.
    pub fn simplify(self) -> Regex {
        let mut current = self;
        loop {
            let next = current.clone().normalize();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    pub fn literal(symbol: &str) -> Regex {
        Literal(symbol.to_string())
    }
}

fn special(c: char) -> bool {
    matches!(c, '(' | ')' | '|' | '*' | '+' | '\\' | 'ε' | '∅')
}

fn write_literal(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    for c in s.chars() {
        if special(c) {
            write!(f, "\\{}", c)?;
        } else {
            write!(f, "{}", c)?;
        }
    }
    Ok(())
}

/// Renders using `|`, `*`, juxtaposition, parentheses, `ε` and `∅`.
/// Alternations are always parenthesized, so they can be juxtaposed or
/// starred without further grouping.
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Null => f.write_str("∅"),
            Empty => f.write_str("ε"),
            Literal(ref s) => write_literal(f, s),
            Alt(ref xs) => {
                f.write_str("(")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", x)?;
                }
                f.write_str(")")
            }
            Cat(ref xs) => {
                for x in xs {
                    match *x {
                        Cat(_) => write!(f, "({})", x)?,
                        _ => write!(f, "{}", x)?,
                    }
                }
                Ok(())
            }
            Kleene(ref x) => match **x {
                Literal(ref s) if s.chars().count() == 1 => write!(f, "{}*", x),
                Alt(_) => write!(f, "{}*", x),
                _ => write!(f, "({})*", x),
            },
        }
    }
}

/*
Char : NORMAL
     : '\' CHAR
Atom : Char
     : 'ε'
     : '∅'
     : '(' Alt ')'
Kleene : Atom
       : Kleene '*'
       : Kleene '+'
Cat :
    : Kleene Cat
Alt : Cat
    : Cat '|' Alt
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedEof(&'static str),
    UnexpectedChar(&'static str, char),
}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::UnexpectedEof(s) => write!(f, "{}", s),
            ParseError::UnexpectedChar(s, c) => write!(f, "{}: `{}`", s, c),
        }
    }
}
impl std::error::Error for ParseError {}

/// Recursive-descent reader for the syntax `Display` writes, so a rendered
/// regex parses back to an equivalent tree.
struct Parser<I: Iterator<Item = char>> {
    it: Peekable<I>,
}
type Res<T> = Result<T, ParseError>;
impl<I: Iterator<Item = char>> Parser<I> {
    fn char(&mut self) -> Res<char> {
        match self.it.next() {
            Some('\\') => match self.it.next() {
                Some(c) => Ok(c),
                None => Err(ParseError::UnexpectedEof("unfollowed '\\'")),
            },
            Some(c) => Ok(c),
            None => Err(ParseError::UnexpectedEof("expected a character")),
        }
    }
    fn atom(&mut self) -> Res<Regex> {
        match self.it.peek() {
            Some(&'(') => {
                self.it.next();
                let r = self.alt()?;
                match self.it.next() {
                    Some(')') => Ok(r),
                    Some(c) => Err(ParseError::UnexpectedChar("unexpected character", c)),
                    None => Err(ParseError::UnexpectedEof("unmatched '('")),
                }
            }
            Some(&'ε') => {
                self.it.next();
                Ok(Empty)
            }
            Some(&'∅') => {
                self.it.next();
                Ok(Null)
            }
            _ => Ok(Literal(self.char()?.to_string())),
        }
    }
    fn atom_first(c: char) -> bool {
        !matches!(c, '|' | ')' | '*' | '+')
    }
    fn kleene(&mut self) -> Res<Regex> {
        let mut r = self.atom()?;
        loop {
            match self.it.peek() {
                Some(&'*') => {
                    self.it.next();
                    r = Kleene(Box::new(r))
                }
                Some(&'+') => {
                    self.it.next();
                    r = Cat(vec![r.clone(), Kleene(Box::new(r))])
                }
                _ => break,
            }
        }
        Ok(r)
    }
    fn cat(&mut self) -> Res<Regex> {
        let mut r = Vec::new();
        loop {
            match self.it.peek() {
                Some(&c) if Parser::<I>::atom_first(c) => r.push(self.kleene()?),
                Some(&c) if (c == '*' || c == '+') && r.is_empty() => {
                    return Err(ParseError::UnexpectedChar("nothing to repeat", c))
                }
                _ => break,
            }
        }
        Ok(Cat(r))
    }
    fn alt(&mut self) -> Res<Regex> {
        let mut r = vec![self.cat()?];
        while let Some(&'|') = self.it.peek() {
            self.it.next();
            r.push(self.cat()?);
        }
        Ok(Alt(r))
    }
    fn parse(it: I) -> Res<Regex> {
        let mut parser = Parser { it: it.peekable() };
        let r = parser.alt()?;
        if let Some(c) = parser.it.next() {
            Err(ParseError::UnexpectedChar("bad character in regex", c))
        } else {
            Ok(r.simplify())
        }
    }
}

impl str::FromStr for Regex {
    type Err = ParseError;
    /// Parse a string as a regular expression. Every character (or escaped
    /// character) is one symbol.
    fn from_str(s: &str) -> Result<Regex, ParseError> {
        Parser::parse(s.chars())
    }
}
