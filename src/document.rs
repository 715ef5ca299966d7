/* JSON document boundary. Decoding validates required fields before looking
* at any content; encoding always emits one complete, well-formed document,
* either a success value or a {success: false, error} value. */

use crate::fa::{Automaton, FaError, FaType, Symbol, EPSILON};
use crate::simulate::Validation;
use crate::subset::ConversionInfo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// The shared document shape for automata, as produced and consumed by every
/// operation. `transitions` maps state name to symbol to a target list whose
/// length is meaningful: empty means no move, more than one means
/// nondeterminism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatonDocument {
    pub states: Vec<String>,
    pub symbols: Vec<String>,
    pub transitions: HashMap<String, HashMap<String, Vec<String>>>,
    pub start_state: String,
    pub end_states: Vec<String>,
}

/// A validation request is an automaton document plus the input string.
/// The states and symbols lists are optional here; the simulator only needs
/// the transition function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub transitions: HashMap<String, HashMap<String, Vec<String>>>,
    pub start_state: String,
    pub end_states: Vec<String>,
    #[serde(default)]
    pub input: Option<String>,
}

fn check_required(value: &Value, fields: &[&'static str]) -> Result<(), FaError> {
    if !value.is_object() {
        return Err(FaError::BadDocument(
            "expected a JSON object".to_string(),
        ));
    }
    for &field in fields {
        if value.get(field).is_none() {
            return Err(FaError::MissingField(field));
        }
    }
    Ok(())
}

fn parse_value(text: &str) -> Result<Value, FaError> {
    serde_json::from_str(text).map_err(|error| FaError::BadDocument(error.to_string()))
}

/// Decode an automaton document, checking required fields first
pub fn decode_automaton(text: &str) -> Result<Automaton, FaError> {
    let value = parse_value(text)?;
    check_required(
        &value,
        &["states", "symbols", "transitions", "start_state", "end_states"],
    )?;
    let document: AutomatonDocument =
        serde_json::from_value(value).map_err(|error| FaError::BadDocument(error.to_string()))?;
    build_automaton(&document)
}

/// Decode a validation request. The input string may instead be supplied by
/// the caller, so it is not required here.
pub fn decode_validation_request(text: &str) -> Result<(Automaton, Option<String>), FaError> {
    let value = parse_value(text)?;
    check_required(&value, &["transitions", "start_state", "end_states"])?;
    let request: ValidationRequest =
        serde_json::from_value(value).map_err(|error| FaError::BadDocument(error.to_string()))?;

    let document = AutomatonDocument {
        states: request.states,
        symbols: request.symbols,
        transitions: request.transitions,
        start_state: request.start_state,
        end_states: request.end_states,
    };
    let mut fa = build_automaton(&document)?;

    // The simulator never consults the alphabet and a request may omit the
    // symbols list entirely, so recover it from the transition function
    for moves in document.transitions.values() {
        for symbol in moves.keys() {
            if let Symbol::Char(ch) = Symbol::from_document(symbol)? {
                fa.add_alphabet(ch);
            }
        }
    }

    Ok((fa, request.input))
}

/// Build the in-memory automaton value from a decoded document. Every state
/// referenced by the start state, the accepting set or a transition becomes a
/// member even when the states list omits it. The working alphabet comes from
/// the declared symbols list alone, so moves on undeclared symbols are never
/// followed. Both epsilon spellings are normalized here and the epsilon
/// marker never enters the alphabet.
pub fn build_automaton(document: &AutomatonDocument) -> Result<Automaton, FaError> {
    let mut fa = Automaton::new();

    for name in &document.states {
        fa.add_state(name);
    }
    fa.add_state(&document.start_state);
    for name in &document.end_states {
        fa.add_state(name);
    }

    for symbol in &document.symbols {
        if let Symbol::Char(ch) = Symbol::from_document(symbol)? {
            fa.add_alphabet(ch);
        }
    }

    for (from, moves) in &document.transitions {
        let from_id = fa.add_state(from);
        for (symbol, targets) in moves {
            let symbol = Symbol::from_document(symbol)?;
            for target in targets {
                let target_id = fa.add_state(target);
                fa.add_transition(from_id, symbol.clone(), target_id);
            }
        }
    }

    let start_id = fa.add_state(&document.start_state);
    fa.set_start_state(start_id);

    for name in &document.end_states {
        if let Some(state_id) = fa.get_state_id(name) {
            fa.set_accept_state(state_id);
        }
    }

    Ok(fa)
}

/// Encode an automaton back into the shared document shape. States appear in
/// id order, symbols and target lists sorted, and only defined transitions
/// are written; a missing entry is the representation of "no move".
pub fn encode_automaton(fa: &Automaton) -> AutomatonDocument {
    let states: Vec<String> = (0..fa.get_num_states())
        .map(|state_id| fa.get_state_name(state_id).to_string())
        .collect();

    let symbols: Vec<String> = fa
        .get_sorted_alphabet()
        .iter()
        .map(|ch| ch.to_string())
        .collect();

    let mut transitions = HashMap::new();
    for state_id in 0..fa.get_num_states() {
        let mut moves = HashMap::new();
        for (symbol, targets) in fa.get_state(state_id).get_transitions() {
            if targets.is_empty() {
                continue;
            }
            let mut names: Vec<String> = targets
                .iter()
                .map(|target| fa.get_state_name(*target).to_string())
                .collect();
            names.sort_unstable();
            moves.insert(symbol.to_string(), names);
        }
        transitions.insert(fa.get_state_name(state_id).to_string(), moves);
    }

    let end_states: Vec<String> = fa
        .get_acceptor_states()
        .iter_ones()
        .map(|state_id| fa.get_state_name(state_id).to_string())
        .collect();

    AutomatonDocument {
        states,
        symbols,
        transitions,
        start_state: fa.get_state_name(fa.get_start_state()).to_string(),
        end_states,
    }
}

/// Output document for subset construction
pub fn encode_conversion(dfa: &Automaton, conversion_info: &ConversionInfo) -> Value {
    json!({
        "success": true,
        "dfa": encode_automaton(dfa),
        "conversion_info": conversion_info,
    })
}

/// Output document for minimization: the DFA fields flattened next to
/// `success`, with an explicit (possibly empty) target list for every symbol
/// and an explicit empty epsilon entry per state, for downstream schema
/// compatibility.
pub fn encode_minimized(dfa: &Automaton) -> Value {
    let alphabet = dfa.get_sorted_alphabet();

    let mut transitions = Map::new();
    for state_id in 0..dfa.get_num_states() {
        let mut moves = Map::new();
        for ch in alphabet.iter() {
            let mut names: Vec<String> = dfa
                .get_state(state_id)
                .get_targets(&Symbol::Char(*ch))
                .map(|targets| {
                    targets
                        .iter()
                        .map(|target| dfa.get_state_name(*target).to_string())
                        .collect()
                })
                .unwrap_or_default();
            names.sort_unstable();
            moves.insert(ch.to_string(), json!(names));
        }
        moves.insert(EPSILON.to_string(), json!([]));
        transitions.insert(
            dfa.get_state_name(state_id).to_string(),
            Value::Object(moves),
        );
    }

    let document = encode_automaton(dfa);
    json!({
        "success": true,
        "states": document.states,
        "symbols": document.symbols,
        "transitions": transitions,
        "start_state": document.start_state,
        "end_states": document.end_states,
    })
}

/// Output document for string validation. Path entries reached through the
/// initial epsilon closure are suffixed with the epsilon marker.
pub fn encode_validation(validation: &Validation) -> Value {
    let path: Vec<String> = validation
        .path
        .iter()
        .map(|entry| {
            if entry.via_epsilon {
                format!("{} ({})", entry.state, EPSILON)
            } else {
                entry.state.clone()
            }
        })
        .collect();

    let mut value = json!({
        "success": validation.error.is_none(),
        "accepted": validation.accepted,
        "path": path,
        "final_state": validation.final_state,
        "input_length": validation.input_length,
        "path_length": path.len(),
    });

    if let Some(error) = &validation.error {
        value["error"] = json!(error);
    }

    value
}

/// Output document for DFA/NFA classification
pub fn encode_fa_type(fa_type: FaType) -> Value {
    json!({
        "success": true,
        "type": fa_type.as_str(),
    })
}

/// Output document for DOT export
pub fn encode_dot(dot: &str) -> Value {
    json!({
        "success": true,
        "dot": dot,
    })
}

/// Every failure leaves the process as one structured error document
pub fn encode_error(error: &FaError) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
    })
}
