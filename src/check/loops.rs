//! Cycle detection on signal paths.

use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;

use super::WalkCheck;
use crate::error::{CheckKind, ModelError};
use crate::parse::graph::ModelGraph;
use crate::walk::{Walk, WalkVisitor};

/// Reports edges that lead back to a node on the current path.
///
/// A target that was only visited on another branch is a convergence, not a
/// loop, and is ignored.
#[derive(Debug, Default)]
pub struct LoopCheck {
    looped: BTreeSet<NodeIndex>,
}

impl LoopCheck {
    fn note(&mut self, walk: &Walk<'_>, edge: NodeIndex, target: NodeIndex) {
        if walk.in_history(target) {
            self.looped.insert(target);
            self.looped.insert(edge);
        }
    }
}

impl WalkVisitor for LoopCheck {
    fn on_connection_element(&mut self, walk: &Walk<'_>, _up: NodeIndex, ce: NodeIndex, down: NodeIndex) {
        self.note(walk, ce, down);
    }

    fn on_value_exchange(&mut self, walk: &Walk<'_>, _up: NodeIndex, ve: NodeIndex, down: NodeIndex) {
        self.note(walk, ve, down);
    }
}

impl WalkCheck for LoopCheck {
    const KIND: CheckKind = CheckKind::Loop;

    fn finish(self, graph: &ModelGraph) -> Option<ModelError> {
        if self.looped.is_empty() {
            return None;
        }
        Some(ModelError::new(
            Self::KIND,
            "Signal path loops back onto itself",
            self.looped.iter().map(|&n| graph.id(n).to_string()).collect(),
        ))
    }
}
