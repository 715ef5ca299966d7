use clap::{Arg, Command};
use color_eyre::eyre::Result;
use fakit::{classify, construct_dfa, document, minimize_dfa, to_dot, validate_string};
use fakit::{FaError, SubsetLimits};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

fn convert_operation(text: &str, limits: &SubsetLimits) -> Result<Value, FaError> {
    let nfa = document::decode_automaton(text)?;
    let (dfa, conversion_info) = construct_dfa(&nfa, limits)?;
    Ok(document::encode_conversion(&dfa, &conversion_info))
}

fn minimize_operation(text: &str) -> Result<Value, FaError> {
    let dfa = document::decode_automaton(text)?;
    let minimal_dfa = minimize_dfa(&dfa)?;
    Ok(document::encode_minimized(&minimal_dfa))
}

fn validate_operation(text: &str, string_arg: Option<&String>) -> Result<Value, FaError> {
    let (fa, document_input) = document::decode_validation_request(text)?;
    let input = match string_arg {
        Some(input) => input.clone(),
        None => document_input.ok_or(FaError::MissingField("input"))?,
    };
    let validation = validate_string(&fa, &input);
    Ok(document::encode_validation(&validation))
}

fn classify_operation(text: &str) -> Result<Value, FaError> {
    let fa = document::decode_automaton(text)?;
    Ok(document::encode_fa_type(classify(&fa)))
}

fn dot_operation(text: &str) -> Result<Value, FaError> {
    let fa = document::decode_automaton(text)?;
    Ok(document::encode_dot(&to_dot(&fa)))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Command::new("fakit")
        .version("1.0")
        .about("A finite automata toolkit which converts NFAs into DFAs, minimizes DFAs and validates input strings against any automaton")
        .arg(
            Arg::new("operation")
                .value_name("OPERATION")
                .value_parser(["convert", "minimize", "validate", "classify", "dot"])
                .required(true)
                .help("convert an NFA to a DFA, minimize a DFA, validate an input string, classify an automaton as DFA or NFA, or export DOT notation")
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("INPUT DOCUMENT FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("The JSON automaton document to operate on. Read from standard input when omitted")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT RESULT FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("The output file for the result document. Written to standard output when omitted")
        )
        .arg(
            Arg::new("string")
                .short('s')
                .long("string")
                .value_name("INPUT STRING")
                .value_parser(clap::value_parser!(String))
                .help("The string to validate. Overrides the document's input field")
        )
        .arg(
            Arg::new("state-limit")
                .short('l')
                .long("state-limit")
                .value_name("STATE LIMIT")
                .value_parser(clap::value_parser!(usize))
                .help("Maximum number of DFA states subset construction may discover before giving up")
        )
        .get_matches();

    let text = match args.get_one::<PathBuf>("input") {
        Some(input_path) => fs::read_to_string(input_path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut limits = SubsetLimits::default();
    if let Some(max_states) = args.get_one::<usize>("state-limit") {
        limits.max_states = *max_states;
    }

    let operation = args
        .get_one::<String>("operation")
        .map(String::as_str)
        .unwrap_or_default();

    let result = match operation {
        "convert" => convert_operation(&text, &limits),
        "minimize" => minimize_operation(&text),
        "validate" => validate_operation(&text, args.get_one::<String>("string")),
        "classify" => classify_operation(&text),
        "dot" => dot_operation(&text),
        other => {
            // clap's value parser rejects anything else already
            unreachable!("unknown operation {}", other)
        }
    };

    // Errors are data: failures still leave as one well-formed document,
    // with a non-zero exit code
    let (value, failed) = match result {
        Ok(value) => (value, false),
        Err(error) => (document::encode_error(&error), true),
    };

    let rendered = serde_json::to_string_pretty(&value)?;

    match args.get_one::<PathBuf>("output") {
        Some(output_path) => fs::write(output_path, format!("{}\n", rendered))?,
        None => println!("{}", rendered),
    }

    if failed {
        std::process::exit(1);
    }

    Ok(())
}
