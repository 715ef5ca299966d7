//! # fakit
//!
//! A finite automata toolkit operating on a shared JSON document shape.
//!
//! This library provides functionality to:
//! - Compute epsilon closures of state sets
//! - Convert NFAs to DFAs using Subset Construction
//! - Minimize DFAs by table-filling over distinguishable state pairs
//! - Validate input strings against any automaton, with path tracing
//! - Classify automata as deterministic or not
//! - Export automata in DOT notation

// Re-export the modules
pub mod closure;
pub mod document;
pub mod dot;
pub mod fa;
pub mod minimize;
pub mod simulate;
pub mod subset;

// Re-export commonly used items for convenience
pub use dot::to_dot;
pub use fa::{classify, Automaton, FaError, FaType, Symbol};
pub use minimize::minimize_dfa;
pub use simulate::validate_string;
pub use subset::{construct_dfa, SubsetLimits};
