use bitvec::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Canonical epsilon marker used in automaton documents.
pub const EPSILON: char = 'ɛ';

/// Alternate epsilon spelling found in the wild. Normalized to [`EPSILON`]
/// at decode time.
pub const EPSILON_ALT: char = 'ε';

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl Symbol {
    /// Parse a symbol as it appears in an automaton document. Both epsilon
    /// spellings map to `Symbol::Epsilon`; anything else must be a single
    /// character.
    pub fn from_document(symbol: &str) -> Result<Self, FaError> {
        let mut chars = symbol.chars();
        let first = match chars.next() {
            Some(ch) => ch,
            None => return Err(FaError::BadSymbol(symbol.to_string())),
        };
        if chars.next().is_some() {
            return Err(FaError::BadSymbol(symbol.to_string()));
        }
        if first == EPSILON || first == EPSILON_ALT {
            Ok(Symbol::Epsilon)
        } else {
            Ok(Symbol::Char(first))
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{}", EPSILON),
            Symbol::Char(ch) => write!(f, "{}", ch),
        }
    }
}

/// List of possible errors while decoding or transforming an automaton
#[derive(Debug)]
pub enum FaError {
    /// The input document is not a JSON object or failed to parse
    BadDocument(String),
    /// A required field is absent from the input document
    MissingField(&'static str),
    /// A symbol is not a single character
    BadSymbol(String),
    /// A transition has more than one target, or is an epsilon move, in an
    /// operation that assumes determinism
    MalformedTransition { state: String, symbol: String },
    /// Subset construction discovered more DFA states than the configured cap
    StateLimit(usize),
}

impl fmt::Display for FaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaError::BadDocument(reason) => {
                write!(f, "Error: Failed to parse the automaton document! {}", reason)
            }
            FaError::MissingField(field) => {
                write!(f, "Error: Missing required field '{}'!", field)
            }
            FaError::BadSymbol(symbol) => {
                write!(f, "Error: Symbol '{}' is not a single character!", symbol)
            }
            FaError::MalformedTransition { state, symbol } => {
                write!(
                    f,
                    "Error: State '{}' is not deterministic on symbol '{}'!",
                    state, symbol
                )
            }
            FaError::StateLimit(limit) => {
                write!(
                    f,
                    "Error: Subset construction exceeded the limit of {} DFA states!",
                    limit
                )
            }
        }
    }
}

impl std::error::Error for FaError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaState {
    name: String,
    transitions: HashMap<Symbol, HashSet<usize>>,
}

impl FaState {
    fn new(name: &str) -> Self {
        FaState {
            name: name.to_string(),
            transitions: HashMap::new(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Get a map of all outgoing transitions for this state
    pub fn get_transitions(&self) -> &HashMap<Symbol, HashSet<usize>> {
        &self.transitions
    }

    /// Get the target set for one symbol, if any move is defined
    pub fn get_targets(&self, symbol: &Symbol) -> Option<&HashSet<usize>> {
        self.transitions.get(symbol)
    }

    fn add_transition(&mut self, symbol: Symbol, to: usize) {
        self.transitions.entry(symbol).or_default().insert(to);
    }
}

/// An automaton value built fresh per invocation. States carry opaque string
/// names; the transition function keeps the target cardinality exactly as
/// given, so the same type represents DFAs and NFAs alike.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<FaState>,
    name_map: HashMap<String, usize>,
    start_state: usize,
    accept_states: BitVec<u8>,
    alphabet: HashSet<char>,
}

impl Default for Automaton {
    fn default() -> Self {
        Automaton::new()
    }
}

impl Automaton {
    pub fn new() -> Self {
        Automaton {
            states: Vec::new(),
            name_map: HashMap::new(),
            start_state: 0,
            accept_states: BitVec::new(),
            alphabet: HashSet::new(),
        }
    }

    /// Add a state with the given name and return its id. Adding a name that
    /// is already present returns the existing id, which is how states
    /// referenced only by transitions or the accepting set become members.
    pub fn add_state(&mut self, name: &str) -> usize {
        if let Some(&state_id) = self.name_map.get(name) {
            return state_id;
        }
        let state_id = self.states.len();
        self.states.push(FaState::new(name));
        self.accept_states.push(false);
        self.name_map.insert(name.to_string(), state_id);
        state_id
    }

    pub fn add_transition(&mut self, from: usize, symbol: Symbol, to: usize) {
        self.states[from].add_transition(symbol, to);
    }

    pub fn set_start_state(&mut self, state_id: usize) {
        self.start_state = state_id;
    }

    pub fn set_accept_state(&mut self, state_id: usize) {
        self.accept_states.set(state_id, true);
    }

    pub fn add_alphabet(&mut self, ch: char) {
        self.alphabet.insert(ch);
    }

    pub fn set_alphabet(&mut self, alphabet: HashSet<char>) {
        self.alphabet = alphabet;
    }

    pub fn get_num_states(&self) -> usize {
        self.states.len()
    }

    pub fn get_start_state(&self) -> usize {
        self.start_state
    }

    pub fn get_alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    /// Get the alphabet as a sorted list, for deterministic iteration
    pub fn get_sorted_alphabet(&self) -> Vec<char> {
        let mut alphabet: Vec<char> = self.alphabet.iter().copied().collect();
        alphabet.sort_unstable();
        alphabet
    }

    pub fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    /// Returns a reference to the state whose id is provided
    pub fn get_state(&self, state_id: usize) -> &FaState {
        &self.states[state_id]
    }

    pub fn get_state_name(&self, state_id: usize) -> &str {
        self.states[state_id].get_name()
    }

    pub fn get_state_id(&self, name: &str) -> Option<usize> {
        self.name_map.get(name).copied()
    }

    /// True if any state has a non-empty epsilon move
    pub fn has_epsilon_moves(&self) -> bool {
        self.states.iter().any(|state| {
            state
                .get_targets(&Symbol::Epsilon)
                .is_some_and(|targets| !targets.is_empty())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaType {
    Dfa,
    Nfa,
}

impl FaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaType::Dfa => "DFA",
            FaType::Nfa => "NFA",
        }
    }
}

/// Classify an automaton by a per-symbol cardinality check: a DFA has no
/// epsilon moves and at most one target per (state, symbol).
pub fn classify(fa: &Automaton) -> FaType {
    for state_id in 0..fa.get_num_states() {
        for (symbol, targets) in fa.get_state(state_id).get_transitions() {
            if targets.is_empty() {
                continue;
            }
            if *symbol == Symbol::Epsilon || targets.len() > 1 {
                return FaType::Nfa;
            }
        }
    }
    FaType::Dfa
}
