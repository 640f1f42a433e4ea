use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::process::Command;

use color_eyre::eyre::Result;
use log::{debug, info, warn};
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::prelude::StableGraph;

use crate::fa::FA;

/// Build a graph with a node for every state, including states that only appear as a transition
/// target. Parallel transitions between the same two states share one edge whose label lists all
/// of their inputs.
pub fn generate_graph<T: FA>(fa: &T) -> StableGraph<String, String> {
    let mut stable_graph = StableGraph::new();

    let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
    let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

    let all_states = fa.get_all_states();

    for state in &all_states {
        let node = stable_graph.add_node(state.to_string());
        node_map.insert(*state, node);
    }

    for state in &all_states {
        let source = node_map[state];

        for (input, target) in fa.get_state_transitions(state) {
            let target = node_map[target];

            match edge_map.get(&(source, target)) {
                Some(edge_idx) => {
                    let old_label = &stable_graph[*edge_idx];
                    let new_label = format!("{}, {}", old_label, input);
                    stable_graph[*edge_idx] = new_label;
                }
                None => {
                    let edge_idx = stable_graph.add_edge(source, target, input.to_string());
                    edge_map.insert((source, target), edge_idx);
                }
            }
        }
    }

    stable_graph
}

/// Write the automaton to `<filename>.dot` and try to render `<filename>.jpg` with Graphviz
pub fn save_dot<T: FA>(fa: &T, filename: &str) -> Result<()> {
    let graph = generate_graph(fa);
    let dot = Dot::new(&graph);

    let dot_filename = format!("{}.dot", filename);
    let mut dot_file = File::create(&dot_filename)?;
    dot_file.write_all(dot.to_string().as_bytes())?;
    debug!("Wrote {} with {} states", dot_filename, graph.node_count());

    let jpg_filename = format!("{}.jpg", filename);
    let output = Command::new("dot")
        .args(["-Tjpg", &dot_filename, "-o", &jpg_filename])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            info!("NDFA visualization saved as {}", jpg_filename);
        }
        Ok(output) => warn!(
            "Graphviz failed to render {}: {}",
            dot_filename,
            String::from_utf8_lossy(&output.stderr)
        ),
        Err(error) => warn!("Failed to execute Graphviz: {}", error),
    }

    Ok(())
}
