//! Test that closing a stream releases every storage cursor beneath it.

use crate::e2e_tests::helpers::{quoted, t, uri, var, vars};
use crate::handler::{QueryHandler, SimpleQueryHandler};
use crate::query::{Query, QueryError, collect_bindings};
use crate::simulation::SimulatedGraph;
use crate::storage::MemoryGraph;
use crate::testing::init_tracing;
use crate::types::Node;

fn simulated() -> SimpleQueryHandler<SimulatedGraph<MemoryGraph>> {
    init_tracing();
    let mut graph = MemoryGraph::new();
    for i in 0..10 {
        let o = uri(&format!("o{i}"));
        graph.add(t(uri("s"), "p", o.clone_value()));
        graph.add(t(o.clone_value(), "q", Node::literal(i.to_string())));
        graph.add(t(quoted(uri("s"), "p", o), "r", uri("d")));
    }
    SimpleQueryHandler::new(SimulatedGraph::new(graph, 1))
}

fn join_query() -> Query {
    Query::new()
        .where_pattern(t(uri("s"), "p", var("o")))
        .where_pattern(t(var("o"), "q", var("z")))
}

#[test]
fn test_close_after_first_binding() {
    let handler = simulated();
    let plan = handler.prepare_bindings(&join_query(), &vars(&["o", "z"])).unwrap();
    let mut results = plan.execute_bindings().unwrap();

    // Building the pipeline does not touch storage.
    assert_eq!(handler.graph().stats().finds, 0);

    assert!(results.next_binding().unwrap().is_some());
    assert_eq!(handler.graph().stats().open_cursors, 2);

    results.close();
    assert_eq!(handler.graph().stats().open_cursors, 0);

    // Closing again is harmless; pulling is not.
    results.close();
    assert!(matches!(results.next_binding(), Err(QueryError::IteratorClosed)));
}

#[test]
fn test_close_nested_pipeline() {
    let handler = simulated();
    let query = Query::new().where_pattern(t(quoted(uri("s"), "p", var("o")), "r", uri("d")));
    let plan = handler.prepare_bindings(&query, &vars(&["o"])).unwrap();

    let mut results = plan.execute_bindings().unwrap();
    assert!(results.next_binding().unwrap().is_some());
    assert!(handler.graph().stats().open_cursors > 0);
    results.close();
    assert_eq!(handler.graph().stats().open_cursors, 0);
}

#[test]
fn test_exhaustion_releases_cursors() {
    let handler = simulated();
    let plan = handler.prepare_bindings(&join_query(), &vars(&["o", "z"])).unwrap();
    let results = collect_bindings(plan.execute_bindings().unwrap()).unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(handler.graph().stats().open_cursors, 0);
}

/// Dropping an unclosed stream skips cursor release.
#[test]
fn test_drop_without_close_leaks_cursors() {
    let handler = simulated();
    let plan = handler.prepare_bindings(&join_query(), &vars(&["o", "z"])).unwrap();
    let mut results = plan.execute_bindings().unwrap();
    assert!(results.next_binding().unwrap().is_some());
    drop(results);
    assert_eq!(handler.graph().stats().open_cursors, 2);
}

#[test]
fn test_close_node_lookup() {
    let handler = simulated();
    let mut objects = handler.objects_for(Some(&uri("s")), None).unwrap();
    assert!(objects.next_node().unwrap().is_some());
    assert_eq!(handler.graph().stats().open_cursors, 1);
    objects.close();
    assert_eq!(handler.graph().stats().open_cursors, 0);
    assert!(matches!(objects.next_node(), Err(QueryError::IteratorClosed)));
}
