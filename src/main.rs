use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use fakit::record::{export_collection, import_collection, AutomatonRecord};
use fakit::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding an array of automaton records (`-` for stdin)
    input: String,

    /// Name of the automaton to use (defaults to the first one)
    #[arg(long)]
    name: Option<String>,

    /// Print derived automata as JSON records
    #[arg(long)]
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the automaton
    Show,
    /// Report whether the automaton is deterministic
    Check,
    /// Test strings for acceptance
    Accepts { inputs: Vec<String> },
    /// Convert to an equivalent DFA
    Determinize,
    /// Minimize a DFA
    Minimize {
        /// Drop unreachable states first
        #[arg(long)]
        trim: bool,
    },
    /// Convert to a regular expression
    Regex,
    /// Re-export every record that loaded (only the selected one with `--name`)
    Export,
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        Ok(s)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path))
    }
}

fn print_automaton(a: &Automaton, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&AutomatonRecord::from(a))?);
    } else {
        print!("{}", a);
    }
    Ok(())
}

fn select<'a>(automata: &'a [Automaton], name: Option<&str>) -> Result<&'a Automaton> {
    match name {
        Some(name) => automata
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| anyhow!("no automaton named {:?}", name)),
        None => match automata.first() {
            Some(a) => Ok(a),
            None => bail!("no automata could be loaded"),
        },
    }
}

fn run(command: Command, automaton: &Automaton, json: bool) -> Result<()> {
    match command {
        Command::Show => print_automaton(automaton, json)?,
        Command::Check => {
            if automaton.is_deterministic() {
                println!("The automaton IS deterministic (DFA)");
            } else {
                println!("The automaton is NOT deterministic (NFA)");
            }
        }
        Command::Accepts { inputs } => {
            let simulator = Simulator::new(automaton);
            for input in &inputs {
                let symbols: Vec<String> = input.chars().map(String::from).collect();
                let verdict = if simulator.run(symbols.iter().map(String::as_str)) {
                    "ACCEPTED"
                } else {
                    "REJECTED"
                };
                println!("String {:?} is {} by the automaton", input, verdict);
            }
        }
        Command::Determinize => print_automaton(&determinize(automaton), json)?,
        Command::Minimize { trim } => {
            let minimized = if trim {
                minimize(&automaton.trim())?
            } else {
                minimize(automaton)?
            };
            print_automaton(&minimized, json)?
        }
        Command::Regex => println!("Regular Expression: {}", to_regex_string(automaton)),
        Command::Export => println!("{}", export_collection(std::slice::from_ref(automaton))?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp(None);
    builder.init();

    let args = Args::parse();

    let automata: Vec<Automaton> = import_collection(&read_input(&args.input)?)?
        .into_iter()
        .filter_map(|a| a.ok())
        .collect();

    match args.command {
        Command::Export if args.name.is_none() => println!("{}", export_collection(&automata)?),
        command => run(command, select(&automata, args.name.as_deref())?, args.json)?,
    }
    Ok(())
}
