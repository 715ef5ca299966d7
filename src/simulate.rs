/* Set-based string validation with path tracing. The current state is always
* a set, so true NFAs simulate correctly without prior determinization. */

use crate::closure::{epsilon_closure, move_set, singleton, StateSet};
use crate::fa::Automaton;

/// One step of the traced path. `via_epsilon` marks states that were only
/// entered through the initial epsilon closure, without consuming input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub state: String,
    pub via_epsilon: bool,
}

/// Outcome of validating one input string against an automaton
#[derive(Debug, Clone)]
pub struct Validation {
    pub accepted: bool,
    pub path: Vec<TraceEntry>,
    pub final_state: String,
    pub input_length: usize,
    pub error: Option<String>,
}

// The lexicographically smallest member name stands in for the whole set
// when a single representative state is reported.
fn representative<'a>(fa: &'a Automaton, current: &StateSet) -> &'a str {
    current
        .get_bits()
        .iter_ones()
        .map(|state_id| fa.get_state_name(state_id))
        .min()
        .unwrap_or("")
}

/// Validate an input string against an automaton, deterministic or not.
/// The current state set starts at the epsilon closure of the start state;
/// each consumed symbol replaces it with the closure of the move result. An
/// empty move result halts immediately with a stuck error naming the symbol
/// and its position, which is distinct from consuming the whole string and
/// ending outside the accepting set.
pub fn validate_string(fa: &Automaton, input: &str) -> Validation {
    let input_length = input.chars().count();

    // An automaton with no states has no start state to close over
    if fa.get_num_states() == 0 {
        return Validation {
            accepted: false,
            path: Vec::new(),
            final_state: String::new(),
            input_length,
            error: Some("The automaton has no states".to_string()),
        };
    }

    let start = fa.get_start_state();

    let mut current = epsilon_closure(fa, singleton(fa, start));

    let mut path = vec![TraceEntry {
        state: fa.get_state_name(start).to_string(),
        via_epsilon: false,
    }];

    // Everything else in the initial closure was reached without input
    let mut closure_entries: Vec<&str> = current
        .get_bits()
        .iter_ones()
        .filter(|&state_id| state_id != start)
        .map(|state_id| fa.get_state_name(state_id))
        .collect();
    closure_entries.sort_unstable();
    for name in closure_entries {
        path.push(TraceEntry {
            state: name.to_string(),
            via_epsilon: true,
        });
    }

    let mut final_state = fa.get_state_name(start).to_string();

    for (position, symbol) in input.chars().enumerate() {
        let end_states = move_set(fa, &current, symbol);

        if end_states.not_any() {
            return Validation {
                accepted: false,
                path,
                final_state,
                input_length,
                error: Some(format!(
                    "No valid transition for symbol '{}' at position {}",
                    symbol, position
                )),
            };
        }

        current = epsilon_closure(fa, end_states);
        final_state = representative(fa, &current).to_string();
        path.push(TraceEntry {
            state: final_state.clone(),
            via_epsilon: false,
        });
    }

    let accepts = fa.get_acceptor_states();
    let mut accepting_members: Vec<&str> = current
        .get_bits()
        .iter_ones()
        .filter(|&state_id| accepts[state_id])
        .map(|state_id| fa.get_state_name(state_id))
        .collect();
    accepting_members.sort_unstable();

    let accepted = !accepting_members.is_empty();
    if let Some(name) = accepting_members.first() {
        final_state = name.to_string();
    }

    Validation {
        accepted,
        path,
        final_state,
        input_length,
        error: None,
    }
}
