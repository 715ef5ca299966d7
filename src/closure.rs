/* Epsilon closure and per-symbol moves over sets of automaton states.
* Shared by subset construction and the string simulator. */

use crate::fa::{Automaton, Symbol};
use bitvec::prelude::*;
use std::collections::VecDeque;
use std::hash::{DefaultHasher, Hash, Hasher};

/// A set of automaton states stored together with its precomputed hash so
/// that dedup lookups during subset construction compare an integer before
/// falling back to the full bit comparison.

#[derive(Debug, Clone)]
pub struct StateSet {
    bits: BitVec<u8>,
    hash: u64,
}

impl StateSet {
    pub fn new(bits: BitVec<u8>) -> Self {
        let mut hasher = DefaultHasher::new();
        bits.hash(&mut hasher);
        let hash = hasher.finish();
        Self { bits, hash }
    }

    pub fn get_bits(&self) -> &BitVec<u8> {
        &self.bits
    }

    pub fn contains(&self, state_id: usize) -> bool {
        self.bits[state_id]
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }
}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bits == other.bits
    }
}

impl Eq for StateSet {}

/// A bitset holding exactly one state
pub fn singleton(fa: &Automaton, state_id: usize) -> BitVec<u8> {
    let mut bits: BitVec<u8, Lsb0> = BitVec::repeat(false, fa.get_num_states());
    bits.set(state_id, true);
    bits
}

/// Compute the smallest superset of `seed` closed under epsilon transitions.
/// Worklist expansion: every newly discovered state is enqueued and its own
/// epsilon moves are followed in turn.
pub fn epsilon_closure(fa: &Automaton, seed: BitVec<u8>) -> StateSet {
    let mut closure = seed;
    let mut work_list: VecDeque<usize> = closure.iter_ones().collect();

    while let Some(state_id) = work_list.pop_front() {
        let targets = fa.get_state(state_id).get_targets(&Symbol::Epsilon);
        if let Some(targets) = targets {
            for target in targets {
                let target = *target;
                if !closure[target] {
                    closure.set(target, true);
                    work_list.push_back(target);
                }
            }
        }
    }

    StateSet::new(closure)
}

/// The set of states reachable from any member of `from` on one input symbol
pub fn move_set(fa: &Automaton, from: &StateSet, symbol: char) -> BitVec<u8> {
    let mut result: BitVec<u8, Lsb0> = BitVec::repeat(false, fa.get_num_states());

    for state_id in from.get_bits().iter_ones() {
        let targets = fa.get_state(state_id).get_targets(&Symbol::Char(symbol));
        let targets = match targets {
            None => continue,
            Some(targets) => targets,
        };
        for target in targets {
            result.set(*target, true);
        }
    }

    result
}
