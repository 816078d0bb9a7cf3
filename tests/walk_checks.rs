//! Integration tests for the walker-based checks: loops, flow direction,
//! end reachability and occurrence consistency.

#[allow(dead_code)]
mod helpers;

use helpers::*;
use valuenet::check::formula::occurrence_rates;
use valuenet::check::{
    EndReachabilityCheck, FlowConsistencyCheck, LiteralFormulas, LoopCheck,
    OccurrenceConsistencyCheck, run,
};
use valuenet::error::{CheckKind, ModelError};
use valuenet::parse::ModelGraph;

fn occurrence(graph: &ModelGraph, tolerance: f64) -> Option<ModelError> {
    let (rates, _) = occurrence_rates(graph, &LiteralFormulas);
    run(graph, OccurrenceConsistencyCheck::new(rates, tolerance)).expect("walk should succeed")
}

// =============================================================================
// LoopCheck
// =============================================================================

#[test]
fn loop_back_to_gate_unit_dot_is_reported() {
    let mut b = forking_gate();
    b.connect("back", "g.fan1", "g.unit");
    let graph = b.graph();

    let error = run(&graph, LoopCheck::default())
        .unwrap()
        .expect("loop should be reported");
    assert_eq!(error.check, CheckKind::Loop);
    assert!(error.subjects.contains(&"g.unit".to_string()), "{:?}", error);
    assert!(error.subjects.contains(&"back".to_string()), "{:?}", error);
}

#[test]
fn removing_the_back_edge_clears_the_loop() {
    let mut b = forking_gate();
    b.connect("back", "g.fan1", "g.unit");
    b.remove("back");
    let graph = b.graph();
    assert_eq!(run(&graph, LoopCheck::default()).unwrap(), None);
}

#[test]
fn converging_branches_are_not_a_loop() {
    let mut b = forking_gate();
    b.connect("join", "g.fan2", "e1.dot");
    let graph = b.graph();
    assert_eq!(run(&graph, LoopCheck::default()).unwrap(), None);
}

#[test]
fn loop_through_the_value_layer_is_reported() {
    // The seller's signal is wired back into the buyer's interface.
    let mut b = buyer_seller();
    b.remove("ce2").connect("ce2", "seller_vi.dot", "buyer_vi.dot");
    let graph = b.graph();

    let error = run(&graph, LoopCheck::default())
        .unwrap()
        .expect("loop should be reported");
    assert_eq!(error.subjects, vec!["buyer_vi.dot".to_string(), "ce2".to_string()]);
}

// =============================================================================
// FlowConsistencyCheck
// =============================================================================

#[test]
fn straight_chain_has_consistent_flow() {
    let mut b = NetworkBuilder::new();
    b.start("s", None, None).end("e", None).connect("ce", "s.dot", "e.dot");
    let graph = b.graph();
    assert_eq!(run(&graph, FlowConsistencyCheck::default()).unwrap(), None);
}

#[test]
fn buyer_seller_has_consistent_flow() {
    let graph = buyer_seller().graph();
    assert_eq!(run(&graph, FlowConsistencyCheck::default()).unwrap(), None);
}

#[test]
fn dot_sending_and_receiving_is_reported() {
    // seller_vi.dot sends to the end signal and receives from a second start.
    let mut b = buyer_seller();
    b.start("s2", Some("seller"), Some("10"))
        .connect("ce3", "s2.dot", "seller_vi.dot");
    let graph = b.graph();

    let error = run(&graph, FlowConsistencyCheck::default())
        .unwrap()
        .expect("conflict should be reported");
    assert_eq!(error.check, CheckKind::Flow);
    assert_eq!(error.subjects, vec!["seller_vi.dot".to_string()]);
}

#[test]
fn dot_rewired_against_its_start_is_reported() {
    let mut b = NetworkBuilder::new();
    b.start("s1", None, None)
        .start("s2", None, None)
        .end("e", None)
        .connect("ce1", "s1.dot", "e.dot")
        .connect("ce2", "s2.dot", "s1.dot");
    let graph = b.graph();

    let error = run(&graph, FlowConsistencyCheck::default())
        .unwrap()
        .expect("conflict should be reported");
    assert_eq!(error.subjects, vec!["s1.dot".to_string()]);
}

#[test]
fn incoming_connection_is_not_crossed_backwards() {
    // ce2 points into s1.dot; walking from s1 must not follow it to s2.dot.
    let mut b = NetworkBuilder::new();
    b.start("s1", None, None)
        .start("s2", None, None)
        .end("e", None)
        .connect("ce1", "s1.dot", "e.dot")
        .connect("ce2", "s2.dot", "s1.dot");
    let graph = b.graph();
    let s1 = graph.index_of("s1.dot").unwrap();
    assert_eq!(
        graph.outgoing_connections(s1),
        vec![graph.index_of("ce1").unwrap()]
    );
    assert_eq!(graph.connections(s1).len(), 2);

    let error = run(&graph, EndReachabilityCheck::default()).unwrap();
    assert_eq!(error.map(|e| e.subjects), Some(vec!["s2".to_string()]));
}

// =============================================================================
// EndReachabilityCheck
// =============================================================================

#[test]
fn start_without_connection_is_reported() {
    let mut b = NetworkBuilder::new();
    b.start("s", None, None).end("e", None);
    let graph = b.graph();

    let error = run(&graph, EndReachabilityCheck::default())
        .unwrap()
        .expect("start should be reported");
    assert_eq!(error.check, CheckKind::Reachability);
    assert_eq!(error.subjects, vec!["s".to_string()]);
}

#[test]
fn connecting_to_an_end_clears_the_report() {
    let mut b = NetworkBuilder::new();
    b.start("s", None, None)
        .end("e", None)
        .gate("g", valuenet::parse::GateKind::And, 1)
        .connect("ce1", "s.dot", "g.unit")
        .connect("ce2", "g.fan1", "e.dot");
    let graph = b.graph();
    assert_eq!(run(&graph, EndReachabilityCheck::default()).unwrap(), None);
}

#[test]
fn only_faulty_starts_are_reported() {
    let mut b = buyer_seller();
    b.start("idle", Some("buyer"), Some("1"));
    let graph = b.graph();

    let error = run(&graph, EndReachabilityCheck::default())
        .unwrap()
        .expect("idle start should be reported");
    assert_eq!(error.subjects, vec!["idle".to_string()]);
}

#[test]
fn path_stopping_in_an_interface_is_reported() {
    let mut b = buyer_seller();
    b.remove("ce2");
    let graph = b.graph();
    let error = run(&graph, EndReachabilityCheck::default()).unwrap();
    assert_eq!(error.map(|e| e.subjects), Some(vec!["s".to_string()]));
}

// =============================================================================
// OccurrenceConsistencyCheck
// =============================================================================

#[test]
fn different_rates_into_one_gate_are_reported() {
    let graph = merging_gate("5", "7").graph();
    let error = occurrence(&graph, 0.0).expect("gate should be reported");
    assert_eq!(error.check, CheckKind::Occurrence);
    assert_eq!(
        error.subjects,
        vec!["g.unit".to_string(), "g.fan1".to_string(), "g.fan2".to_string()]
    );
}

#[test]
fn equal_rates_into_one_gate_are_consistent() {
    let graph = merging_gate("5", "5").graph();
    assert_eq!(occurrence(&graph, 0.0), None);
}

#[test]
fn unevaluable_rate_leaves_its_dot_unset() {
    let graph = merging_gate("5", "often").graph();
    let error = occurrence(&graph, 0.0).expect("gate should be reported");
    assert!(error.subjects.contains(&"g.fan2".to_string()));
}

#[test]
fn rates_within_tolerance_are_consistent() {
    let graph = merging_gate("5", "5.01").graph();
    assert_eq!(occurrence(&graph, 0.05), None);
    assert!(occurrence(&graph, 0.0).is_some());
}

#[test]
fn negative_tolerance_counts_as_zero() {
    let graph = merging_gate("5", "5").graph();
    assert_eq!(occurrence(&graph, -1.0), None);
    assert_eq!(occurrence(&graph, f64::NAN), None);
}

#[test]
fn forking_gate_carries_one_rate() {
    let graph = forking_gate().graph();
    assert_eq!(occurrence(&graph, 0.0), None);
}
