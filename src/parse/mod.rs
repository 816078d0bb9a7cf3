//! Parse phase: snapshot JSON → Rust types + graph construction.

pub mod graph;
pub mod types;

pub use graph::ModelGraph;
pub use types::*;

use crate::error::InputError;

/// Deserialize a value-network JSON string into a `ValueNetwork`.
pub fn parse(json: &str) -> Result<ValueNetwork, Vec<InputError>> {
    serde_json::from_str::<ValueNetwork>(json).map_err(|e| {
        vec![InputError::parse(
            "P001",
            format!("Failed to parse value network JSON: {}", e),
        )]
    })
}

/// Parse JSON and build the graph in one step.
pub fn parse_and_build(json: &str) -> Result<(ValueNetwork, ModelGraph), Vec<InputError>> {
    let network = parse(json)?;
    let graph = ModelGraph::build(&network)?;
    Ok((network, graph))
}
