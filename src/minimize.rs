/* DFA minimization by table filling: prune unreachable states, mark
* distinguishable state pairs to a fixpoint, then merge the unmarked pairs
* into equivalence classes with union-find. */

use crate::fa::{Automaton, FaError, Symbol};
use bitvec::prelude::*;
use std::collections::{HashMap, VecDeque};

/// Union-find over state indices. Path compression is written as a loop so
/// that deep parent chains never recurse.
struct LookupTable {
    parent: Vec<usize>,
}

impl LookupTable {
    fn new(size: usize) -> Self {
        LookupTable {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, item: usize) -> usize {
        let mut root = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Second pass re-points everything on the walked path at the root
        let mut current = item;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    fn unite(&mut self, first: usize, second: usize) {
        let first_root = self.find(first);
        let second_root = self.find(second);
        if first_root != second_root {
            self.parent[second_root] = first_root;
        }
    }
}

/// Check that every transition of a would-be DFA really is deterministic:
/// no non-empty epsilon moves and at most one target per symbol. Runs before
/// any traversal so a malformed document never yields a partial result.
fn check_deterministic(dfa: &Automaton) -> Result<(), FaError> {
    for state_id in 0..dfa.get_num_states() {
        let state = dfa.get_state(state_id);
        for (symbol, targets) in state.get_transitions() {
            if targets.is_empty() {
                continue;
            }
            let malformed = match symbol {
                Symbol::Epsilon => true,
                Symbol::Char(_) => targets.len() > 1,
            };
            if malformed {
                return Err(FaError::MalformedTransition {
                    state: state.get_name().to_string(),
                    symbol: symbol.to_string(),
                });
            }
        }
    }
    Ok(())
}

// The lone target of a deterministic transition. Only valid after
// check_deterministic has passed.
fn lone_target(dfa: &Automaton, state_id: usize, symbol: char) -> Option<usize> {
    dfa.get_state(state_id)
        .get_targets(&Symbol::Char(symbol))
        .and_then(|targets| targets.iter().next())
        .copied()
}

/// States reachable from the start state by any sequence of alphabet symbols
fn reachable_states(dfa: &Automaton, alphabet: &[char]) -> BitVec<u8> {
    let mut reachable: BitVec<u8, Lsb0> = BitVec::repeat(false, dfa.get_num_states());
    let mut work_list = VecDeque::new();

    reachable.set(dfa.get_start_state(), true);
    work_list.push_back(dfa.get_start_state());

    while let Some(state_id) = work_list.pop_front() {
        for c in alphabet {
            if let Some(target) = lone_target(dfa, state_id, *c) {
                if !reachable[target] {
                    reachable.set(target, true);
                    work_list.push_back(target);
                }
            }
        }
    }

    reachable
}

/// Mark every unordered pair of distinguishable states, to a fixpoint.
/// Seeded with the accepting/non-accepting split; whenever a pair is newly
/// marked, all still-unmarked pairs are re-examined: a pair becomes
/// distinguishable when exactly one side has a move on some symbol, or both
/// move and the targets form an already-marked pair.
fn fill_table(
    dfa: &Automaton,
    states: &[usize],
    index_of: &HashMap<usize, usize>,
    alphabet: &[char],
) -> BitVec<u8> {
    let num_states = states.len();
    let pair_index = |low: usize, high: usize| low * num_states + high;

    let mut marked: BitVec<u8, Lsb0> = BitVec::repeat(false, num_states * num_states);
    let mut newly_marked: VecDeque<(usize, usize)> = VecDeque::new();

    let accepts = dfa.get_acceptor_states();

    for i in 0..num_states {
        for j in (i + 1)..num_states {
            if accepts[states[i]] != accepts[states[j]] {
                marked.set(pair_index(i, j), true);
                newly_marked.push_back((i, j));
            }
        }
    }

    while newly_marked.pop_front().is_some() {
        for r in 0..num_states {
            for s in (r + 1)..num_states {
                if marked[pair_index(r, s)] {
                    continue;
                }
                for c in alphabet {
                    let r_target = lone_target(dfa, states[r], *c);
                    let s_target = lone_target(dfa, states[s], *c);

                    let split = match (r_target, s_target) {
                        (None, None) => false,
                        (Some(_), None) | (None, Some(_)) => true,
                        (Some(r_next), Some(s_next)) => {
                            let r_next = index_of[&r_next];
                            let s_next = index_of[&s_next];
                            r_next != s_next
                                && marked[pair_index(r_next.min(s_next), r_next.max(s_next))]
                        }
                    };

                    if split {
                        marked.set(pair_index(r, s), true);
                        newly_marked.push_back((r, s));
                        break;
                    }
                }
            }
        }
    }

    marked
}

/// Minimize a DFA by merging states no input string can tell apart. The
/// result is language-equivalent to the reachable part of the input and has
/// the minimum state count. Each merged class is named by its representative:
/// the original start state when it is a member, otherwise the
/// lexicographically smallest member name, so the start state keeps its
/// original name whenever it is reachable.
pub fn minimize_dfa(dfa: &Automaton) -> Result<Automaton, FaError> {
    check_deterministic(dfa)?;

    let alphabet = dfa.get_sorted_alphabet();

    // Unreachable states would pollute the equivalence classes, drop them
    // before comparing anything
    let reachable = reachable_states(dfa, &alphabet);
    let states: Vec<usize> = reachable.iter_ones().collect();
    let num_states = states.len();

    let mut index_of: HashMap<usize, usize> = HashMap::new();
    for (index, state_id) in states.iter().enumerate() {
        index_of.insert(*state_id, index);
    }

    let marked = fill_table(dfa, &states, &index_of, &alphabet);
    let pair_index = |low: usize, high: usize| low * num_states + high;

    // Merge every unmarked pair; the fixpoint makes the relation transitive,
    // so the union-find classes form a valid partition
    let mut lookup_table = LookupTable::new(num_states);
    for i in 0..num_states {
        for j in (i + 1)..num_states {
            if !marked[pair_index(i, j)] {
                lookup_table.unite(i, j);
            }
        }
    }

    // Pick a representative per class: the start state if present, else the
    // lexicographically smallest member name
    let start_id = dfa.get_start_state();
    let mut representatives: HashMap<usize, usize> = HashMap::new();
    for index in 0..num_states {
        let root = lookup_table.find(index);
        let state_id = states[index];
        let current = *representatives.entry(root).or_insert(state_id);
        if current != start_id
            && (state_id == start_id
                || dfa.get_state_name(state_id) < dfa.get_state_name(current))
        {
            representatives.insert(root, state_id);
        }
    }

    // Rebuild one state per class, in representative name order so the
    // output is stable
    let mut result = Automaton::new();
    result.set_alphabet(dfa.get_alphabet().clone());

    let mut classes: Vec<(usize, usize)> = representatives.iter().map(|(&r, &s)| (r, s)).collect();
    classes.sort_by(|a, b| dfa.get_state_name(a.1).cmp(dfa.get_state_name(b.1)));

    let mut class_state: HashMap<usize, usize> = HashMap::new();
    for (root, representative) in classes.iter() {
        let state_id = result.add_state(dfa.get_state_name(*representative));
        class_state.insert(*root, state_id);
    }

    let start_root = lookup_table.find(index_of[&start_id]);
    result.set_start_state(class_state[&start_root]);

    for index in 0..num_states {
        if dfa.get_acceptor_states()[states[index]] {
            let root = lookup_table.find(index);
            result.set_accept_state(class_state[&root]);
        }
    }

    for (root, representative) in classes.iter() {
        let from = class_state[root];
        for c in alphabet.iter() {
            if let Some(target) = lone_target(dfa, *representative, *c) {
                let target_root = lookup_table.find(index_of[&target]);
                result.add_transition(from, Symbol::Char(*c), class_state[&target_root]);
            }
        }
    }

    Ok(result)
}
