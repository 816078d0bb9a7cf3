//! Rust types mirroring the editor's value-network snapshot.
//!
//! Every element of a model, including connection elements and value
//! exchanges, is a node with its own id so it can be named in findings.

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL NETWORK
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueNetwork {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<ModelNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelNode {
    pub id: String,
    /// Containing node. `None` for root-level actors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl ModelNode {
    pub fn new(id: impl Into<String>, parent: Option<&str>, kind: NodeKind) -> Self {
        ModelNode {
            id: id.into(),
            parent: parent.map(str::to_string),
            kind,
        }
    }
}

// =============================================================================
// NODE KIND — closed tagged union
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GateKind {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    // Containers
    Actor {
        #[serde(default)]
        name: Option<String>,
    },
    MarketSegment {
        #[serde(default)]
        name: Option<String>,
    },
    ValueActivity {
        #[serde(default)]
        name: Option<String>,
    },

    // Signal layer
    StartSignal {
        /// Formula text for the occurrence rate.
        #[serde(default)]
        occurrences: Option<String>,
    },
    EndSignal,
    SignalDot,
    ConnectionElement {
        source: String,
        target: String,
    },
    LogicBase {
        gate: GateKind,
    },
    LogicDot {
        #[serde(rename = "isUnit")]
        is_unit: bool,
        #[serde(default = "default_proportion")]
        proportion: i64,
    },

    // Value layer
    ValueInterface {
        #[serde(default)]
        name: Option<String>,
    },
    ValuePort {
        incoming: bool,
    },
    ValueExchange {
        source: String,
        target: String,
        #[serde(default, rename = "valueObject")]
        value_object: Option<String>,
    },
}

fn default_proportion() -> i64 {
    1
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Actor { .. } => "actor",
            NodeKind::MarketSegment { .. } => "market segment",
            NodeKind::ValueActivity { .. } => "value activity",
            NodeKind::StartSignal { .. } => "start signal",
            NodeKind::EndSignal => "end signal",
            NodeKind::SignalDot => "signal dot",
            NodeKind::ConnectionElement { .. } => "connection element",
            NodeKind::LogicBase { .. } => "logic gate",
            NodeKind::LogicDot { .. } => "logic dot",
            NodeKind::ValueInterface { .. } => "value interface",
            NodeKind::ValuePort { .. } => "value port",
            NodeKind::ValueExchange { .. } => "value exchange",
        }
    }

    pub fn is_dot(&self) -> bool {
        matches!(self, NodeKind::SignalDot | NodeKind::LogicDot { .. })
    }

    /// The two terminal ids of an edge element, if this is one.
    pub fn terminals(&self) -> Option<(&str, &str)> {
        match self {
            NodeKind::ConnectionElement { source, target }
            | NodeKind::ValueExchange { source, target, .. } => {
                Some((source.as_str(), target.as_str()))
            }
            _ => None,
        }
    }
}
