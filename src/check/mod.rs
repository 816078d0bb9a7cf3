//! Model checks.
//!
//! Runs the one-pass scans and every walker-based check over a graph and
//! collects their findings. Each walker-based check sweeps all start signals
//! with its own visitor, so no state is shared between checks.

pub mod flow;
pub mod formula;
pub mod loops;
pub mod occurrence;
pub mod reachability;
pub mod scans;

pub use flow::FlowConsistencyCheck;
pub use formula::{FormulaEvaluator, LiteralFormulas};
pub use loops::LoopCheck;
pub use occurrence::OccurrenceConsistencyCheck;
pub use reachability::EndReachabilityCheck;

use crate::config::CheckConfig;
use crate::error::{CheckKind, ModelError, StructuralError};
use crate::parse::graph::ModelGraph;
use crate::walk::{WalkVisitor, walk_all};

/// A visitor that turns what it saw over all walks into at most one finding.
pub trait WalkCheck: WalkVisitor + Sized {
    const KIND: CheckKind;

    fn finish(self, graph: &ModelGraph) -> Option<ModelError>;
}

/// Sweep every start signal with `check` and return its finding.
pub fn run<C: WalkCheck>(graph: &ModelGraph, mut check: C) -> Result<Option<ModelError>, StructuralError> {
    if let Err(e) = walk_all(graph, &mut check) {
        tracing::warn!(check = ?C::KIND, error = %e, "walk aborted on a corrupt graph");
        return Err(e);
    }
    let finding = check.finish(graph);
    tracing::debug!(
        check = ?C::KIND,
        subjects = finding.as_ref().map_or(0, |f| f.subjects.len()),
        "walk check finished"
    );
    Ok(finding)
}

/// Run every check with the default configuration and literal formulas.
pub fn check(graph: &ModelGraph) -> Result<Vec<ModelError>, StructuralError> {
    check_with(graph, &CheckConfig::default(), &LiteralFormulas)
}

/// Run every check not skipped by `config`. Findings of all checks are
/// returned together; an empty list means nothing was found.
pub fn check_with(
    graph: &ModelGraph,
    config: &CheckConfig,
    evaluator: &dyn FormulaEvaluator,
) -> Result<Vec<ModelError>, StructuralError> {
    let mut errors = Vec::new();

    if config.runs(CheckKind::StartSignal) {
        scans::has_start_signal(graph, &mut errors);
    }
    if config.runs(CheckKind::UnusedPort) {
        scans::unused_ports(graph, &mut errors);
    }
    if config.runs(CheckKind::DuplicateValueObject) {
        scans::duplicate_value_objects(graph, &mut errors);
    }

    let (rates, failures) = formula::occurrence_rates(graph, evaluator);
    if config.runs(CheckKind::Formula) {
        errors.extend(formula::formula_errors(&failures));
    }

    if config.runs(CheckKind::Loop) {
        errors.extend(run(graph, LoopCheck::default())?);
    }
    if config.runs(CheckKind::Flow) {
        errors.extend(run(graph, FlowConsistencyCheck::default())?);
    }
    if config.runs(CheckKind::Reachability) {
        errors.extend(run(graph, EndReachabilityCheck::default())?);
    }
    if config.runs(CheckKind::Occurrence) {
        let check = OccurrenceConsistencyCheck::new(rates, config.rate_tolerance);
        errors.extend(run(graph, check)?);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        errors = errors.len(),
        "model check finished"
    );
    Ok(errors)
}
