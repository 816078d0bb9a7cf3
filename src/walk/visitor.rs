//! Hooks a check implements to observe a walk.

use petgraph::graph::NodeIndex;

use super::Walk;

/// How a value interface was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Through its own signal dot, coming off a connection element.
    FromSignal,
    /// Through one of its ports, coming off a value exchange.
    FromPort,
}

/// Callbacks fired by [`walk`](super::walk) when it enters a node.
///
/// Each hook fires once per entered node per root, after the node is marked
/// visited and before it is pushed onto the history. All hooks default to
/// doing nothing, so a check only implements the transitions it cares about.
#[allow(unused_variables)]
pub trait WalkVisitor {
    /// The walk is about to start at `start`.
    fn on_start_signal(&mut self, walk: &Walk<'_>, start: NodeIndex) {}

    fn on_signal_dot(&mut self, walk: &Walk<'_>, dot: NodeIndex) {}

    /// A dot was reached over a connection element. It may be a signal dot or
    /// a logic dot; the kind is only dispatched on the next step.
    fn on_dot(&mut self, walk: &Walk<'_>, dot: NodeIndex) {}

    /// `ce` is crossed from `up` towards `down`. `down` has not been entered
    /// yet and may already be visited or even on the history.
    fn on_connection_element(
        &mut self,
        walk: &Walk<'_>,
        up: NodeIndex,
        ce: NodeIndex,
        down: NodeIndex,
    ) {
    }

    /// `narrowing` is true when the gate was entered through a fan dot.
    fn on_logic_base(&mut self, walk: &Walk<'_>, gate: NodeIndex, narrowing: bool) {}

    fn on_logic_dot(&mut self, walk: &Walk<'_>, dot: NodeIndex) {}

    fn on_end_signal(&mut self, walk: &Walk<'_>, end: NodeIndex) {}

    fn on_value_interface(&mut self, walk: &Walk<'_>, interface: NodeIndex, entry: Entry) {}

    fn on_value_port(&mut self, walk: &Walk<'_>, port: NodeIndex) {}

    /// Same contract as [`on_connection_element`](Self::on_connection_element)
    /// for the value layer.
    fn on_value_exchange(
        &mut self,
        walk: &Walk<'_>,
        up: NodeIndex,
        ve: NodeIndex,
        down: NodeIndex,
    ) {
    }

    /// The history collapsed; the walk from `walk.root()` is complete.
    fn on_walk_finished(&mut self, walk: &Walk<'_>) {}
}
