//! Error types shared by every phase of a model check.
//!
//! Three classes exist: `InputError` for snapshots that cannot be parsed or
//! resolved, `StructuralError` for graphs that break the invariants the walker
//! relies on (fatal for the run), and `ModelError` for findings the user can fix.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Build,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Build => write!(f, "Build"),
        }
    }
}

/// The snapshot handed over by the editor could not be turned into a graph.
#[derive(Debug, Clone)]
pub struct InputError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for InputError {}

impl InputError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        InputError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn build(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        InputError {
            code: code.into(),
            phase: Phase::Build,
            message: message.into(),
            node_id,
        }
    }
}

/// A walker invariant does not hold. The graph is corrupt, not merely badly
/// modelled, so the whole run is aborted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("walk must start at a start signal, '{node}' is a {kind}")]
    NotAStartSignal { node: String, kind: &'static str },

    #[error("no transition from {subject_kind} '{subject}' entered from {}", describe_ancestor(.ancestor))]
    UnexpectedTransition {
        subject: String,
        subject_kind: &'static str,
        ancestor: Option<(String, &'static str)>,
    },

    #[error("{kind} '{owner}' has no signal dot")]
    MissingSignalDot { owner: String, kind: &'static str },

    #[error("logic gate '{gate}' has no unit dot")]
    MissingUnitDot { gate: String },

    #[error("dot '{dot}' is not owned by a node that can hold it")]
    MisplacedDot { dot: String },

    #[error("value port '{port}' is not owned by a value interface")]
    MisplacedPort { port: String },

    #[error("edge '{edge}' is not attached to '{terminal}'")]
    DetachedEdge { edge: String, terminal: String },

    #[error("value port '{port}' has {count} value exchanges")]
    MultipleExchanges { port: String, count: usize },
}

fn describe_ancestor(ancestor: &Option<(String, &'static str)>) -> String {
    match ancestor {
        Some((id, kind)) => format!("{} '{}'", kind, id),
        None => "nothing".to_string(),
    }
}

/// Identifies the check that produced a `ModelError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckKind {
    StartSignal,
    UnusedPort,
    DuplicateValueObject,
    Formula,
    Loop,
    Flow,
    Reachability,
    Occurrence,
}

impl CheckKind {
    pub fn code(&self) -> &'static str {
        match self {
            CheckKind::StartSignal => "S001",
            CheckKind::UnusedPort => "S002",
            CheckKind::DuplicateValueObject => "S003",
            CheckKind::Formula => "F001",
            CheckKind::Loop => "W001",
            CheckKind::Flow => "W002",
            CheckKind::Reachability => "W003",
            CheckKind::Occurrence => "W004",
        }
    }
}

/// A finding the user can act on: a message plus the nodes to highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelError {
    pub check: CheckKind,
    pub message: String,
    pub subjects: Vec<String>,
}

impl ModelError {
    pub fn new(check: CheckKind, message: impl Into<String>, subjects: Vec<String>) -> Self {
        ModelError {
            check,
            message: message.into(),
            subjects,
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.subjects.is_empty() {
            write!(f, "[{}] {}", self.check.code(), self.message)
        } else {
            write!(
                f,
                "[{}] {} ({})",
                self.check.code(),
                self.message,
                self.subjects.join(", ")
            )
        }
    }
}

/// A formula could not be evaluated for a node attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("{attribute} of '{node}' has no formula")]
    Missing { node: String, attribute: String },

    #[error("{attribute} of '{node}' cannot be evaluated: {reason}")]
    Invalid {
        node: String,
        attribute: String,
        reason: String,
    },

    #[error("'{node}' has no attribute {attribute}")]
    UnknownAttribute { node: String, attribute: String },
}

impl FormulaError {
    /// Id of the node whose formula failed.
    pub fn node(&self) -> &str {
        match self {
            FormulaError::Missing { node, .. }
            | FormulaError::Invalid { node, .. }
            | FormulaError::UnknownAttribute { node, .. } => node,
        }
    }
}
