//! Iterative depth-first walk over the signal and value layers.
//!
//! A walk starts at one start signal and follows the type-dependent adjacency
//! rules of the model: along connection elements from source to target dot, through logic
//! gates, into value interfaces and across value exchanges to the
//! counterparty interface. The path from the root is kept on an explicit
//! history stack, so hooks can tell a back-edge to an ancestor apart from a
//! convergence with a branch explored earlier. Models are user-authored and
//! may contain cycles; the walk never recurses and never pushes a node twice.

pub mod visitor;

pub use visitor::{Entry, WalkVisitor};

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::error::StructuralError;
use crate::parse::graph::ModelGraph;
use crate::parse::types::NodeKind;

/// State of one walk from one root, as seen by the hooks.
pub struct Walk<'g> {
    graph: &'g ModelGraph,
    root: NodeIndex,
    visited: HashSet<NodeIndex>,
    history: Vec<NodeIndex>,
    on_path: HashSet<NodeIndex>,
}

impl<'g> Walk<'g> {
    pub fn graph(&self) -> &'g ModelGraph {
        self.graph
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Current path from the root. The root is first.
    pub fn history(&self) -> &[NodeIndex] {
        &self.history
    }

    /// Whether `node` is an ancestor on the current path.
    pub fn in_history(&self, node: NodeIndex) -> bool {
        self.on_path.contains(&node)
    }

    pub fn was_visited(&self, node: NodeIndex) -> bool {
        self.visited.contains(&node)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn push(&mut self, node: NodeIndex) {
        self.history.push(node);
        self.on_path.insert(node);
    }

    fn pop(&mut self) {
        if let Some(node) = self.history.pop() {
            self.on_path.remove(&node);
        }
    }

    fn ancestor(&self) -> Option<NodeIndex> {
        let len = self.history.len();
        len.checked_sub(2).map(|i| self.history[i])
    }

    /// Compute the next node to push from `subject`, firing its hook.
    /// `None` means backtrack.
    fn advance<V: WalkVisitor + ?Sized>(
        &mut self,
        subject: NodeIndex,
        visitor: &mut V,
    ) -> Result<Option<NodeIndex>, StructuralError> {
        let graph = self.graph;
        let ancestor = self.ancestor();
        let ancestor_kind = ancestor.map(|a| graph.kind(a));

        match graph.kind(subject) {
            NodeKind::StartSignal { .. } if ancestor.is_none() => {
                let dot = self.owned_signal_dot(subject)?;
                Ok(self.enter(dot, visitor, |v, w| v.on_signal_dot(w, dot)))
            }

            NodeKind::SignalDot => match ancestor_kind {
                Some(NodeKind::ConnectionElement { .. }) => self.leave_signal_dot(subject, visitor),
                Some(NodeKind::ValueInterface { .. } | NodeKind::StartSignal { .. }) => {
                    self.cross_connection(subject, visitor)
                }
                _ => Err(self.unexpected(subject)),
            },

            NodeKind::LogicDot { is_unit, .. } => match ancestor_kind {
                Some(NodeKind::ConnectionElement { .. }) => {
                    let gate = graph
                        .parent(subject)
                        .filter(|&p| matches!(graph.kind(p), NodeKind::LogicBase { .. }))
                        .ok_or_else(|| StructuralError::MisplacedDot {
                            dot: graph.id(subject).to_string(),
                        })?;
                    let narrowing = !*is_unit;
                    Ok(self.enter(gate, visitor, |v, w| v.on_logic_base(w, gate, narrowing)))
                }
                Some(NodeKind::LogicBase { .. }) => self.cross_connection(subject, visitor),
                _ => Err(self.unexpected(subject)),
            },

            NodeKind::ConnectionElement { .. } => {
                let from = ancestor.ok_or_else(|| self.unexpected(subject))?;
                let dot = self.far_terminal(subject, from)?;
                Ok(self.enter(dot, visitor, |v, w| v.on_dot(w, dot)))
            }

            NodeKind::LogicBase { .. } => match ancestor {
                Some(through) if matches!(graph.kind(through), NodeKind::LogicDot { .. }) => {
                    let next = if graph.is_unit_dot(through) {
                        graph
                            .fan_dots(subject)
                            .into_iter()
                            .find(|d| !self.visited.contains(d))
                    } else {
                        let unit = graph.unit_dot(subject).ok_or_else(|| {
                            StructuralError::MissingUnitDot {
                                gate: graph.id(subject).to_string(),
                            }
                        })?;
                        Some(unit)
                    };
                    Ok(next.and_then(|dot| self.enter(dot, visitor, |v, w| v.on_logic_dot(w, dot))))
                }
                _ => Err(self.unexpected(subject)),
            },

            NodeKind::EndSignal => Ok(None),

            NodeKind::ValueInterface { .. } => match ancestor_kind {
                Some(NodeKind::SignalDot) => {
                    let port = graph
                        .value_ports(subject)
                        .into_iter()
                        .find(|p| !self.visited.contains(p));
                    Ok(port.and_then(|port| self.enter(port, visitor, |v, w| v.on_value_port(w, port))))
                }
                Some(NodeKind::ValuePort { .. }) => {
                    let dot = self.owned_signal_dot(subject)?;
                    Ok(self.enter(dot, visitor, |v, w| v.on_signal_dot(w, dot)))
                }
                _ => Err(self.unexpected(subject)),
            },

            NodeKind::ValuePort { .. } => match ancestor_kind {
                Some(NodeKind::ValueExchange { .. }) => {
                    let interface = graph
                        .parent(subject)
                        .filter(|&p| matches!(graph.kind(p), NodeKind::ValueInterface { .. }))
                        .ok_or_else(|| StructuralError::MisplacedPort {
                            port: graph.id(subject).to_string(),
                        })?;
                    Ok(self.enter(interface, visitor, |v, w| {
                        v.on_value_interface(w, interface, Entry::FromPort)
                    }))
                }
                Some(NodeKind::ValueInterface { .. }) => self.cross_exchange(subject, visitor),
                _ => Err(self.unexpected(subject)),
            },

            NodeKind::ValueExchange { .. } => {
                let from = ancestor.ok_or_else(|| self.unexpected(subject))?;
                let port = self.far_terminal(subject, from)?;
                Ok(self.enter(port, visitor, |v, w| v.on_value_port(w, port)))
            }

            NodeKind::StartSignal { .. }
            | NodeKind::Actor { .. }
            | NodeKind::MarketSegment { .. }
            | NodeKind::ValueActivity { .. } => Err(self.unexpected(subject)),
        }
    }

    /// Mark `next` visited and fire its hook. `None` if it was already visited.
    fn enter<V: WalkVisitor + ?Sized>(
        &mut self,
        next: NodeIndex,
        visitor: &mut V,
        hook: impl FnOnce(&mut V, &Walk<'g>),
    ) -> Option<NodeIndex> {
        if !self.visited.insert(next) {
            return None;
        }
        hook(visitor, self);
        Some(next)
    }

    /// A signal dot reached over a connection element hands over to its owner.
    fn leave_signal_dot<V: WalkVisitor + ?Sized>(
        &mut self,
        dot: NodeIndex,
        visitor: &mut V,
    ) -> Result<Option<NodeIndex>, StructuralError> {
        let graph = self.graph;
        let misplaced = || StructuralError::MisplacedDot {
            dot: graph.id(dot).to_string(),
        };
        let owner = graph.parent(dot).ok_or_else(misplaced)?;

        match graph.kind(owner) {
            NodeKind::ValueInterface { .. } => Ok(self.enter(owner, visitor, |v, w| {
                v.on_value_interface(w, owner, Entry::FromSignal)
            })),
            NodeKind::EndSignal => Ok(self.enter(owner, visitor, |v, w| v.on_end_signal(w, owner))),
            // Start signals are roots only; a path running into one ends there.
            NodeKind::StartSignal { .. } => {
                tracing::trace!(dot = graph.id(dot), "signal path runs into a start signal");
                Ok(None)
            }
            _ => Err(misplaced()),
        }
    }

    /// Cross the first unvisited connection element whose source is `dot`.
    fn cross_connection<V: WalkVisitor + ?Sized>(
        &mut self,
        dot: NodeIndex,
        visitor: &mut V,
    ) -> Result<Option<NodeIndex>, StructuralError> {
        let next = self
            .graph
            .outgoing_connections(dot)
            .into_iter()
            .find(|ce| !self.visited.contains(ce));
        let Some(ce) = next else { return Ok(None) };

        let down = self.far_terminal(ce, dot)?;
        Ok(self.enter(ce, visitor, |v, w| v.on_connection_element(w, dot, ce, down)))
    }

    fn cross_exchange<V: WalkVisitor + ?Sized>(
        &mut self,
        port: NodeIndex,
        visitor: &mut V,
    ) -> Result<Option<NodeIndex>, StructuralError> {
        let exchanges = self.graph.exchanges(port);
        if exchanges.len() > 1 {
            return Err(StructuralError::MultipleExchanges {
                port: self.graph.id(port).to_string(),
                count: exchanges.len(),
            });
        }
        let Some(&ve) = exchanges.first() else { return Ok(None) };

        let down = self.far_terminal(ve, port)?;
        Ok(self.enter(ve, visitor, |v, w| v.on_value_exchange(w, port, ve, down)))
    }

    fn far_terminal(&self, edge: NodeIndex, from: NodeIndex) -> Result<NodeIndex, StructuralError> {
        self.graph
            .other_terminal(edge, from)
            .ok_or_else(|| StructuralError::DetachedEdge {
                edge: self.graph.id(edge).to_string(),
                terminal: self.graph.id(from).to_string(),
            })
    }

    fn owned_signal_dot(&self, owner: NodeIndex) -> Result<NodeIndex, StructuralError> {
        self.graph
            .signal_dot(owner)
            .ok_or_else(|| StructuralError::MissingSignalDot {
                owner: self.graph.id(owner).to_string(),
                kind: self.graph.kind(owner).name(),
            })
    }

    fn unexpected(&self, subject: NodeIndex) -> StructuralError {
        StructuralError::UnexpectedTransition {
            subject: self.graph.id(subject).to_string(),
            subject_kind: self.graph.kind(subject).name(),
            ancestor: self
                .ancestor()
                .map(|a| (self.graph.id(a).to_string(), self.graph.kind(a).name())),
        }
    }
}

/// Walk the model from one start signal.
pub fn walk<V: WalkVisitor + ?Sized>(
    graph: &ModelGraph,
    root: NodeIndex,
    visitor: &mut V,
) -> Result<(), StructuralError> {
    let kind = graph.kind(root);
    if !matches!(kind, NodeKind::StartSignal { .. }) {
        return Err(StructuralError::NotAStartSignal {
            node: graph.id(root).to_string(),
            kind: kind.name(),
        });
    }
    tracing::trace!(root = graph.id(root), "walking signal path");

    let mut walk = Walk {
        graph,
        root,
        visited: HashSet::new(),
        history: Vec::new(),
        on_path: HashSet::new(),
    };
    walk.visited.insert(root);
    visitor.on_start_signal(&walk, root);
    walk.push(root);

    while let Some(&subject) = walk.history.last() {
        match walk.advance(subject, visitor)? {
            Some(next) => walk.push(next),
            None => walk.pop(),
        }
    }

    visitor.on_walk_finished(&walk);
    Ok(())
}

/// Walk the model once from every start signal, in snapshot order.
pub fn walk_all<V: WalkVisitor + ?Sized>(
    graph: &ModelGraph,
    visitor: &mut V,
) -> Result<(), StructuralError> {
    for root in graph.start_signals() {
        walk(graph, root, visitor)?;
    }
    Ok(())
}
