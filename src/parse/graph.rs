//! petgraph-backed value-network graph.
//!
//! Containment is stored as `Contains` links from owner to child. Edge
//! elements (connection elements, value exchanges) are nodes with two
//! `Terminal` links to the dots or ports they join.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};

use super::types::{NodeKind, ValueNetwork};
use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Contains,
    Terminal,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct ModelGraph {
    pub graph: DiGraph<Element, Link>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl ModelGraph {
    pub fn build(network: &ValueNetwork) -> Result<Self, Vec<InputError>> {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut errors = Vec::new();

        // Add all nodes
        for node in &network.nodes {
            if node_indices.contains_key(&node.id) {
                errors.push(InputError::build(
                    "P003",
                    format!("Duplicate node id '{}'", node.id),
                    Some(node.id.clone()),
                ));
                continue;
            }
            let idx = graph.add_node(Element {
                id: node.id.clone(),
                kind: node.kind.clone(),
            });
            node_indices.insert(node.id.clone(), idx);
        }

        // Containment, in snapshot order so children keep their order
        for node in &network.nodes {
            let Some(parent) = &node.parent else { continue };
            let child_idx = node_indices[&node.id];
            match node_indices.get(parent) {
                Some(&parent_idx) => {
                    graph.add_edge(parent_idx, child_idx, Link::Contains);
                }
                None => errors.push(InputError::build(
                    "P002",
                    format!("Node '{}' references unknown parent '{}'", node.id, parent),
                    Some(node.id.clone()),
                )),
            }
        }

        // Edge terminals
        for node in &network.nodes {
            let Some((source, target)) = node.kind.terminals() else {
                continue;
            };
            let edge_idx = node_indices[&node.id];
            for terminal in [source, target] {
                let Some(&terminal_idx) = node_indices.get(terminal) else {
                    errors.push(InputError::build(
                        "P002",
                        format!(
                            "Edge '{}' references unknown terminal '{}'",
                            node.id, terminal
                        ),
                        Some(node.id.clone()),
                    ));
                    continue;
                };
                let terminal_kind = &graph[terminal_idx].kind;
                let fits = match node.kind {
                    NodeKind::ValueExchange { .. } => {
                        matches!(terminal_kind, NodeKind::ValuePort { .. })
                    }
                    _ => terminal_kind.is_dot(),
                };
                if !fits {
                    errors.push(InputError::build(
                        "P005",
                        format!(
                            "{} '{}' cannot attach to {} '{}'",
                            node.kind.name(),
                            node.id,
                            terminal_kind.name(),
                            terminal
                        ),
                        Some(node.id.clone()),
                    ));
                    continue;
                }
                graph.add_edge(edge_idx, terminal_idx, Link::Terminal);
            }
        }

        let containment = EdgeFiltered::from_fn(&graph, |e| *e.weight() == Link::Contains);
        if let Err(cycle) = toposort(&containment, None) {
            let id = graph[cycle.node_id()].id.clone();
            errors.push(InputError::build(
                "P004",
                format!("Node '{}' is its own ancestor", id),
                Some(id),
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ModelGraph { graph, node_indices })
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    pub fn id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].id
    }

    pub fn kind(&self, idx: NodeIndex) -> &NodeKind {
        &self.graph[idx].kind
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All nodes in snapshot order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn start_signals(&self) -> Vec<NodeIndex> {
        self.nodes()
            .filter(|&n| matches!(self.kind(n), NodeKind::StartSignal { .. }))
            .collect()
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .find(|e| *e.weight() == Link::Contains)
            .map(|e| e.source())
    }

    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.linked(idx, Direction::Outgoing, Link::Contains)
    }

    /// The signal dot owned by a start signal, end signal or value interface.
    pub fn signal_dot(&self, owner: NodeIndex) -> Option<NodeIndex> {
        self.children(owner)
            .into_iter()
            .find(|&c| matches!(self.kind(c), NodeKind::SignalDot))
    }

    pub fn logic_dots(&self, gate: NodeIndex) -> Vec<NodeIndex> {
        self.children(gate)
            .into_iter()
            .filter(|&c| matches!(self.kind(c), NodeKind::LogicDot { .. }))
            .collect()
    }

    pub fn unit_dot(&self, gate: NodeIndex) -> Option<NodeIndex> {
        self.logic_dots(gate)
            .into_iter()
            .find(|&d| self.is_unit_dot(d))
    }

    pub fn fan_dots(&self, gate: NodeIndex) -> Vec<NodeIndex> {
        self.logic_dots(gate)
            .into_iter()
            .filter(|&d| !self.is_unit_dot(d))
            .collect()
    }

    pub fn is_unit_dot(&self, idx: NodeIndex) -> bool {
        matches!(self.kind(idx), NodeKind::LogicDot { is_unit: true, .. })
    }

    pub fn value_ports(&self, interface: NodeIndex) -> Vec<NodeIndex> {
        self.children(interface)
            .into_iter()
            .filter(|&c| matches!(self.kind(c), NodeKind::ValuePort { .. }))
            .collect()
    }

    /// Connection elements attached to a dot.
    pub fn connections(&self, dot: NodeIndex) -> Vec<NodeIndex> {
        self.attached(dot, |k| matches!(k, NodeKind::ConnectionElement { .. }))
    }

    /// Connection elements whose source is `dot`.
    pub fn outgoing_connections(&self, dot: NodeIndex) -> Vec<NodeIndex> {
        let id = self.id(dot);
        self.attached(dot, |k| {
            matches!(k, NodeKind::ConnectionElement { source, .. } if source == id)
        })
    }

    /// Value exchanges attached to a port.
    pub fn exchanges(&self, port: NodeIndex) -> Vec<NodeIndex> {
        self.attached(port, |k| matches!(k, NodeKind::ValueExchange { .. }))
    }

    /// The terminal of `edge` opposite to `from`. `None` when `from` is not
    /// one of its terminals.
    pub fn other_terminal(&self, edge: NodeIndex, from: NodeIndex) -> Option<NodeIndex> {
        let (source, target) = self.kind(edge).terminals()?;
        let source = self.index_of(source)?;
        let target = self.index_of(target)?;
        if source == from {
            Some(target)
        } else if target == from {
            Some(source)
        } else {
            None
        }
    }

    fn attached(&self, idx: NodeIndex, is_edge: impl Fn(&NodeKind) -> bool) -> Vec<NodeIndex> {
        let mut edges: Vec<NodeIndex> = self
            .linked(idx, Direction::Incoming, Link::Terminal)
            .into_iter()
            .filter(|&e| is_edge(self.kind(e)))
            .collect();
        // A self-connected edge links to the same terminal twice
        edges.dedup();
        edges
    }

    fn linked(&self, idx: NodeIndex, direction: Direction, link: Link) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| *e.weight() == link)
            .map(|e| match direction {
                Direction::Outgoing => e.target(),
                Direction::Incoming => e.source(),
            })
            .collect();
        nodes.sort();
        nodes
    }
}
