//! Every start signal must lead to at least one end signal.

use petgraph::graph::NodeIndex;

use super::WalkCheck;
use crate::error::{CheckKind, ModelError};
use crate::parse::graph::ModelGraph;
use crate::walk::{Walk, WalkVisitor};

#[derive(Debug, Default)]
pub struct EndReachabilityCheck {
    reached_end: bool,
    faulty: Vec<NodeIndex>,
}

impl WalkVisitor for EndReachabilityCheck {
    fn on_start_signal(&mut self, _walk: &Walk<'_>, _start: NodeIndex) {
        self.reached_end = false;
    }

    fn on_end_signal(&mut self, _walk: &Walk<'_>, _end: NodeIndex) {
        self.reached_end = true;
    }

    fn on_walk_finished(&mut self, walk: &Walk<'_>) {
        if !self.reached_end {
            self.faulty.push(walk.root());
        }
    }
}

impl WalkCheck for EndReachabilityCheck {
    const KIND: CheckKind = CheckKind::Reachability;

    fn finish(self, graph: &ModelGraph) -> Option<ModelError> {
        if self.faulty.is_empty() {
            return None;
        }
        Some(ModelError::new(
            Self::KIND,
            "No end signal is reachable from start signal",
            self.faulty.iter().map(|&n| graph.id(n).to_string()).collect(),
        ))
    }
}
