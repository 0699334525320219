use fakit::{accepts, determinize, minimize, to_regex, Automaton, Regex, Transitions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: [&str; 2] = ["a", "b"];
const MAX_LEN: usize = 6;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_nfa(rng: &mut StdRng, id: usize, max_states: usize) -> Automaton {
    let n = rng.gen_range(1..=max_states);
    let states: Vec<String> = (0..n).map(|i| format!("s{}", i)).collect();
    let mut transitions = Transitions::new();
    for from in &states {
        for symbol in ALPHABET {
            for to in &states {
                if rng.gen_bool(0.35) {
                    transitions.insert(from, symbol, to);
                }
            }
        }
    }
    let accept: Vec<String> = states.iter().filter(|_| rng.gen_bool(0.4)).cloned().collect();
    Automaton::new(&format!("nfa{}", id), states.clone(), ALPHABET, "s0", accept, transitions).unwrap()
}

fn all_strings() -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..MAX_LEN {
        let mut next = Vec::new();
        for s in &frontier {
            for symbol in ALPHABET {
                next.push(format!("{}{}", s, symbol));
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}

fn check_same_language(a: &Automaton, b: &Automaton) {
    for s in all_strings() {
        if accepts(a, &s) != accepts(b, &s) {
            panic!("{} and {} disagree on {:?}\n{}\n{}", a.name(), b.name(), s, a, b);
        }
    }
}

#[test]
fn test_determinize_preserves_language() {
    init();
    let mut rng = StdRng::seed_from_u64(7);
    for id in 0..40 {
        let nfa = random_nfa(&mut rng, id, 4);
        let dfa = determinize(&nfa);
        assert!(dfa.is_deterministic());
        check_same_language(&nfa, &dfa);
    }
}

#[test]
fn test_minimize_preserves_language() {
    init();
    let mut rng = StdRng::seed_from_u64(11);
    for id in 0..40 {
        let dfa = determinize(&random_nfa(&mut rng, id, 4)).into_owned();
        let min = minimize(&dfa).unwrap();
        assert!(min.is_deterministic());
        assert!(min.states().len() <= dfa.states().len());
        check_same_language(&dfa, &min);

        let again = minimize(&min).unwrap();
        assert_eq!(min.states().len(), again.states().len(), "{}", dfa);

        let trimmed = minimize(&dfa.trim()).unwrap();
        assert!(trimmed.states().len() <= min.states().len());
        check_same_language(&dfa, &trimmed);
    }
}

#[test]
fn test_regex_preserves_language() {
    init();
    let mut rng = StdRng::seed_from_u64(23);
    for id in 0..25 {
        let nfa = random_nfa(&mut rng, id, 3);
        let rendered = to_regex(&nfa).to_string();
        let parsed: Regex = rendered
            .parse()
            .unwrap_or_else(|e| panic!("cannot reparse {:?}: {}", rendered, e));
        for s in all_strings() {
            assert_eq!(
                accepts(&nfa, &s),
                parsed.is_match(&s),
                "{} vs {:?} on {:?}",
                nfa,
                rendered,
                s
            );
        }
        let back = Automaton::from_regex("back", &parsed, ALPHABET);
        check_same_language(&nfa, &back);
    }
}

#[test]
fn test_regex_of_minimized_agrees() {
    init();
    let mut rng = StdRng::seed_from_u64(31);
    for id in 0..15 {
        let dfa = determinize(&random_nfa(&mut rng, id, 3)).into_owned();
        let min = minimize(&dfa).unwrap();
        let back = Automaton::from_regex("back", &to_regex(&min), ALPHABET);
        check_same_language(&dfa, &back);
    }
}

/// Like [`random_nfa`], plus edges through an undeclared state `x` and on a
/// symbol `c` that is not in the alphabet.
fn random_nfa_with_strays(rng: &mut StdRng, id: usize) -> Automaton {
    let base = random_nfa(rng, id, 2);
    let mut transitions = base.transitions().clone();
    let mut endpoints: Vec<String> = base.states().iter().cloned().collect();
    endpoints.push("x".to_string());
    for from in &endpoints {
        for symbol in ["a", "b", "c"] {
            for to in &endpoints {
                let stray = from == "x" || to == "x" || symbol == "c";
                if stray && rng.gen_bool(0.3) {
                    transitions.insert(from, symbol, to);
                }
            }
        }
    }
    Automaton::new(
        base.name(),
        base.states().iter().cloned(),
        ALPHABET,
        base.start(),
        base.accept().iter().cloned(),
        transitions,
    )
    .unwrap()
}

fn strings_with_foreign_symbol() -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..4 {
        let mut next = Vec::new();
        for s in &frontier {
            for symbol in ["a", "b", "c"] {
                next.push(format!("{}{}", s, symbol));
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}

#[test]
fn test_stray_states_and_symbols_agree() {
    init();
    let mut rng = StdRng::seed_from_u64(43);
    for id in 0..30 {
        let nfa = random_nfa_with_strays(&mut rng, id);
        let dfa = determinize(&nfa).into_owned();
        let min = minimize(&dfa).unwrap();
        assert!(min.is_deterministic(), "{}\n{}", nfa, min);

        let rendered = to_regex(&nfa).to_string();
        let parsed: Regex = rendered
            .parse()
            .unwrap_or_else(|e| panic!("cannot reparse {:?}: {}", rendered, e));
        for s in strings_with_foreign_symbol() {
            let expected = accepts(&nfa, &s);
            assert_eq!(expected, accepts(&min, &s), "{}\n{}\non {:?}", nfa, min, s);
            assert_eq!(expected, parsed.is_match(&s), "{} vs {:?} on {:?}", nfa, rendered, s);
        }
    }
}
