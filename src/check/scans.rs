//! One-pass structural scans that need no walk.

use std::collections::HashMap;

use crate::error::{CheckKind, ModelError};
use crate::parse::graph::ModelGraph;
use crate::parse::types::NodeKind;

pub fn has_start_signal(graph: &ModelGraph, errors: &mut Vec<ModelError>) {
    if graph.start_signals().is_empty() {
        errors.push(ModelError::new(
            CheckKind::StartSignal,
            "Model must contain at least one start signal",
            vec![],
        ));
    }
}

pub fn unused_ports(graph: &ModelGraph, errors: &mut Vec<ModelError>) {
    let unused: Vec<String> = graph
        .nodes()
        .filter(|&n| matches!(graph.kind(n), NodeKind::ValuePort { .. }))
        .filter(|&n| graph.exchanges(n).is_empty())
        .map(|n| graph.id(n).to_string())
        .collect();

    if !unused.is_empty() {
        errors.push(ModelError::new(
            CheckKind::UnusedPort,
            "Value port is not connected to a value exchange",
            unused,
        ));
    }
}

/// Ports of one interface that transfer the same value object in the same
/// direction.
pub fn duplicate_value_objects(graph: &ModelGraph, errors: &mut Vec<ModelError>) {
    let mut duplicates = Vec::new();

    for interface in graph.nodes() {
        if !matches!(graph.kind(interface), NodeKind::ValueInterface { .. }) {
            continue;
        }

        let mut by_object: HashMap<(bool, &str), Vec<_>> = HashMap::new();
        for port in graph.value_ports(interface) {
            let NodeKind::ValuePort { incoming } = graph.kind(port) else {
                continue;
            };
            for exchange in graph.exchanges(port) {
                if let NodeKind::ValueExchange {
                    value_object: Some(object),
                    ..
                } = graph.kind(exchange)
                {
                    by_object.entry((*incoming, object.as_str())).or_default().push(port);
                }
            }
        }

        let mut ports: Vec<_> = by_object
            .into_values()
            .filter(|ports| ports.len() > 1)
            .flatten()
            .collect();
        ports.sort();
        ports.dedup();
        duplicates.extend(ports);
    }

    if !duplicates.is_empty() {
        errors.push(ModelError::new(
            CheckKind::DuplicateValueObject,
            "Value interface exchanges the same value object twice in one direction",
            duplicates.iter().map(|&n| graph.id(n).to_string()).collect(),
        ));
    }
}
