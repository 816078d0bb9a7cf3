//! Formula evaluation seam and the formula-correctness check.
//!
//! Numeric attributes are formulas written by the user. The expression
//! language lives outside this crate; checks only talk to a
//! [`FormulaEvaluator`].

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::error::{CheckKind, FormulaError, ModelError};
use crate::parse::graph::ModelGraph;
use crate::parse::types::NodeKind;

/// Attribute holding the occurrence rate of a start signal.
pub const OCCURRENCES: &str = "OCCURRENCES";

pub trait FormulaEvaluator {
    fn evaluate(
        &self,
        graph: &ModelGraph,
        node: NodeIndex,
        attribute: &str,
    ) -> Result<f64, FormulaError>;
}

/// Evaluates formulas that are plain number literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralFormulas;

impl FormulaEvaluator for LiteralFormulas {
    fn evaluate(
        &self,
        graph: &ModelGraph,
        node: NodeIndex,
        attribute: &str,
    ) -> Result<f64, FormulaError> {
        let id = graph.id(node).to_string();
        let formula = match graph.kind(node) {
            NodeKind::StartSignal { occurrences } if attribute == OCCURRENCES => occurrences,
            _ => {
                return Err(FormulaError::UnknownAttribute {
                    node: id,
                    attribute: attribute.to_string(),
                });
            }
        };

        let Some(formula) = formula.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
            return Err(FormulaError::Missing {
                node: id,
                attribute: attribute.to_string(),
            });
        };

        let invalid = |reason: String| FormulaError::Invalid {
            node: id.clone(),
            attribute: attribute.to_string(),
            reason,
        };
        let value: f64 = formula
            .parse()
            .map_err(|_| invalid(format!("'{}' is not a number", formula)))?;
        if !value.is_finite() {
            return Err(invalid(format!("'{}' is not finite", formula)));
        }
        if value < 0.0 {
            return Err(invalid(format!("'{}' is negative", formula)));
        }
        Ok(value)
    }
}

/// Evaluate the occurrence rate of every start signal. Failed roots are left
/// out of the map.
pub fn occurrence_rates(
    graph: &ModelGraph,
    evaluator: &dyn FormulaEvaluator,
) -> (HashMap<NodeIndex, f64>, Vec<FormulaError>) {
    let mut rates = HashMap::new();
    let mut failures = Vec::new();

    for start in graph.start_signals() {
        match evaluator.evaluate(graph, start, OCCURRENCES) {
            Ok(rate) => {
                rates.insert(start, rate);
            }
            Err(e) => failures.push(e),
        }
    }

    (rates, failures)
}

/// One finding per failed formula.
pub fn formula_errors(failures: &[FormulaError]) -> Vec<ModelError> {
    failures
        .iter()
        .map(|f| ModelError::new(CheckKind::Formula, f.to_string(), vec![f.node().to_string()]))
        .collect()
}
