//! Occurrence rates must agree on all dots of a logic gate.
//!
//! Each walk stamps the dots it connects with the occurrence rate of its
//! root. A gate whose dots carry different stamps, or where some dots carry
//! none, merges or splits paths that do not occur equally often.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use super::WalkCheck;
use crate::error::{CheckKind, ModelError};
use crate::parse::graph::ModelGraph;
use crate::parse::types::NodeKind;
use crate::walk::{Walk, WalkVisitor};

#[derive(Debug)]
pub struct OccurrenceConsistencyCheck {
    rates: HashMap<NodeIndex, f64>,
    tolerance: f64,
    current: Option<f64>,
    stamps: HashMap<NodeIndex, f64>,
}

impl OccurrenceConsistencyCheck {
    /// `rates` holds the evaluated occurrence rate per start signal. Roots
    /// without a rate stamp nothing. A negative or NaN `tolerance` counts as 0.
    pub fn new(rates: HashMap<NodeIndex, f64>, tolerance: f64) -> Self {
        OccurrenceConsistencyCheck {
            rates,
            tolerance: tolerance.max(0.0),
            current: None,
            stamps: HashMap::new(),
        }
    }
}

impl WalkVisitor for OccurrenceConsistencyCheck {
    fn on_start_signal(&mut self, _walk: &Walk<'_>, start: NodeIndex) {
        self.current = self.rates.get(&start).copied();
    }

    fn on_connection_element(&mut self, _walk: &Walk<'_>, up: NodeIndex, _ce: NodeIndex, down: NodeIndex) {
        if let Some(rate) = self.current {
            self.stamps.insert(up, rate);
            self.stamps.insert(down, rate);
        }
    }
}

impl WalkCheck for OccurrenceConsistencyCheck {
    const KIND: CheckKind = CheckKind::Occurrence;

    fn finish(self, graph: &ModelGraph) -> Option<ModelError> {
        let mut inconsistent = Vec::new();

        for gate in graph.nodes() {
            if !matches!(graph.kind(gate), NodeKind::LogicBase { .. }) {
                continue;
            }
            let dots = graph.logic_dots(gate);
            let stamps: Vec<Option<f64>> = dots.iter().map(|d| self.stamps.get(d).copied()).collect();
            if !consistent(&stamps, self.tolerance) {
                inconsistent.extend(dots);
            }
        }

        if inconsistent.is_empty() {
            return None;
        }
        Some(ModelError::new(
            Self::KIND,
            "Occurrence rates differ between the dots of a logic gate",
            inconsistent.iter().map(|&n| graph.id(n).to_string()).collect(),
        ))
    }
}

/// At most one distinct value, where a missing stamp is a value of its own.
fn consistent(stamps: &[Option<f64>], tolerance: f64) -> bool {
    let rates: Vec<f64> = stamps.iter().flatten().copied().collect();
    if rates.is_empty() {
        return true;
    }
    if rates.len() != stamps.len() {
        return false;
    }
    let (min, max) = rates
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| (lo.min(r), hi.max(r)));
    max - min <= tolerance
}
