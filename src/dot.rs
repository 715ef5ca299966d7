use crate::fa::Automaton;
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::prelude::StableGraph;
use std::collections::HashMap;

/// Render an automaton as a DOT digraph. Parallel transitions between the
/// same pair of states are merged into one edge with a combined label, and
/// the start and accepting states are called out in their node labels.
pub fn to_dot(fa: &Automaton) -> String {
    let mut stable_graph: StableGraph<String, String> = StableGraph::new();

    let num_states = fa.get_num_states();

    for state_id in 0..num_states {
        let mut node_label = fa.get_state_name(state_id).to_string();
        if fa.get_acceptor_states()[state_id] {
            node_label = format!("Accept\n{}", node_label);
        }
        if state_id == fa.get_start_state() {
            node_label = format!("Start\n{}", node_label);
        }
        stable_graph.add_node(node_label);
    }

    let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

    for state_id in 0..num_states {
        // Sorted so the rendered document is stable across runs
        let mut moves: Vec<(String, usize)> = Vec::new();
        for (symbol, targets) in fa.get_state(state_id).get_transitions() {
            for target in targets {
                moves.push((symbol.to_string(), *target));
            }
        }
        moves.sort();

        for (edge_label, target) in moves {
            let endpoints = (NodeIndex::new(state_id), NodeIndex::new(target));

            let edge_idx = match edge_map.get(&endpoints) {
                Some(&edge_idx) => edge_idx,
                None => {
                    let edge_idx =
                        stable_graph.add_edge(endpoints.0, endpoints.1, String::new());
                    edge_map.insert(endpoints, edge_idx);
                    edge_idx
                }
            };

            let old_label = &stable_graph[edge_idx];
            let new_label = if old_label.is_empty() {
                edge_label
            } else {
                format!("{}, {}", old_label, edge_label)
            };

            stable_graph[edge_idx] = new_label;
        }
    }

    Dot::new(&stable_graph).to_string()
}
