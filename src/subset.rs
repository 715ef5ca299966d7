/* Subset construction: convert an epsilon-aware NFA into an equivalent DFA.
* Discovered state sets are deduplicated by exact content, so two discovery
* paths reaching the same set collapse into one DFA state. */

use crate::closure::{epsilon_closure, move_set, singleton, StateSet};
use crate::fa::{Automaton, FaError, Symbol};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Resource bounds for subset construction. The number of discovered DFA
/// states is worst-case exponential in the NFA state count, so construction
/// fails with [`FaError::StateLimit`] instead of running unbounded.
#[derive(Debug, Clone, Copy)]
pub struct SubsetLimits {
    pub max_states: usize,
}

impl Default for SubsetLimits {
    fn default() -> Self {
        SubsetLimits { max_states: 10_000 }
    }
}

/// Metrics reported alongside the constructed DFA
#[derive(Debug, Clone, Serialize)]
pub struct ConversionInfo {
    pub original_nfa_states: usize,
    pub resulting_dfa_states: usize,
    pub epsilon_transitions_removed: bool,
}

/// Apply the subset construction algorithm on an NFA to build a DFA. DFA
/// states are named sequentially in discovery order, the start state first.
/// A DFA state accepts iff its underlying set intersects the NFA's accepting
/// set. When a move result closes to the empty set no transition is emitted;
/// absence of a transition is the representation of rejection on that symbol.
pub fn construct_dfa(
    nfa: &Automaton,
    limits: &SubsetLimits,
) -> Result<(Automaton, ConversionInfo), FaError> {
    let mut result = Automaton::new();
    result.set_alphabet(nfa.get_alphabet().clone()); // DFA has the same alphabet as the NFA,
                                                     // epsilon excluded at decode time

    let nfa_accepts = nfa.get_acceptor_states();
    let alphabet = nfa.get_sorted_alphabet();

    let q0 = epsilon_closure(nfa, singleton(nfa, nfa.get_start_state()));

    let d0 = result.add_state("q0");
    result.set_start_state(d0);

    if (q0.get_bits().clone() & nfa_accepts).any() {
        result.set_accept_state(d0);
    }

    let mut set_ids: HashMap<StateSet, usize> = HashMap::new(); // Mapping from NFA state set to DFA state
    let mut work_list: VecDeque<(StateSet, usize)> = VecDeque::new();

    set_ids.insert(q0.clone(), d0);
    work_list.push_back((q0, d0));

    while let Some((q, dq)) = work_list.pop_front() {
        for c in alphabet.iter() {
            let end_states = move_set(nfa, &q, *c);
            if end_states.not_any() {
                continue;
            }

            let t = epsilon_closure(nfa, end_states);

            let dt = if let Some(&existing_dt) = set_ids.get(&t) {
                existing_dt
            } else {
                if result.get_num_states() >= limits.max_states {
                    return Err(FaError::StateLimit(limits.max_states));
                }

                let name = format!("q{}", result.get_num_states());
                let dt = result.add_state(&name);

                if (t.get_bits().clone() & nfa_accepts).any() {
                    result.set_accept_state(dt);
                }

                set_ids.insert(t.clone(), dt);
                work_list.push_back((t, dt));
                dt
            };

            result.add_transition(dq, Symbol::Char(*c), dt);
        }
    }

    let conversion_info = ConversionInfo {
        original_nfa_states: nfa.get_num_states(),
        resulting_dfa_states: result.get_num_states(),
        epsilon_transitions_removed: nfa.has_epsilon_moves(),
    };

    Ok((result, conversion_info))
}
