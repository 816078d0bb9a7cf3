//! Direction consistency of connection elements.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::NodeIndex;

use super::WalkCheck;
use crate::error::{CheckKind, ModelError};
use crate::parse::graph::ModelGraph;
use crate::walk::{Walk, WalkVisitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Send,
    Receive,
}

/// Every dot must act either as the sending or as the receiving end of the
/// connections it takes part in, across all walks.
#[derive(Debug, Default)]
pub struct FlowConsistencyCheck {
    roles: HashMap<NodeIndex, Role>,
    conflicts: BTreeSet<NodeIndex>,
}

impl FlowConsistencyCheck {
    fn assign(&mut self, dot: NodeIndex, role: Role) {
        let seen = *self.roles.entry(dot).or_insert(role);
        if seen != role {
            self.conflicts.insert(dot);
        }
    }
}

impl WalkVisitor for FlowConsistencyCheck {
    fn on_connection_element(&mut self, _walk: &Walk<'_>, up: NodeIndex, _ce: NodeIndex, down: NodeIndex) {
        self.assign(up, Role::Send);
        self.assign(down, Role::Receive);
    }
}

impl WalkCheck for FlowConsistencyCheck {
    const KIND: CheckKind = CheckKind::Flow;

    fn finish(self, graph: &ModelGraph) -> Option<ModelError> {
        if self.conflicts.is_empty() {
            return None;
        }
        Some(ModelError::new(
            Self::KIND,
            "Signal dot is used both as sending and as receiving end",
            self.conflicts.iter().map(|&n| graph.id(n).to_string()).collect(),
        ))
    }
}
