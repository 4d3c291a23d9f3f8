//! Test that storage failures surface as errors rather than empty results.

use crate::e2e_tests::helpers::{example_graph, quoted, t, uri, var, vars};
use crate::handler::{QueryHandler, SimpleQueryHandler};
use crate::query::{Query, QueryError, collect_bindings};
use crate::simulation::{FaultConfig, SimulatedGraph};
use crate::storage::{MemoryGraph, StorageError};
use crate::testing::init_tracing;

fn failing(config: FaultConfig) -> SimpleQueryHandler<SimulatedGraph<MemoryGraph>> {
    init_tracing();
    SimpleQueryHandler::new(SimulatedGraph::with_config(example_graph(), 3, config))
}

#[test]
fn test_read_error_propagates() {
    let handler = failing(FaultConfig::failing_reads());
    let query = Query::new().where_pattern(t(uri("a"), "p", var("x")));
    let plan = handler.prepare_bindings(&query, &vars(&["x"])).unwrap();

    let result = collect_bindings(plan.execute_bindings().unwrap());
    assert!(matches!(
        result,
        Err(QueryError::Storage(StorageError::InjectedFault(_)))
    ));
    // The failed stream was still closed.
    assert_eq!(handler.graph().stats().open_cursors, 0);
}

#[test]
fn test_find_error_propagates_through_triple_terms() {
    let handler = failing(FaultConfig::failing_finds());
    let query = Query::new().where_pattern(t(quoted(uri("a"), "p", var("x")), "r", uri("d")));
    let plan = handler.prepare_bindings(&query, &vars(&["x"])).unwrap();

    let mut results = plan.execute_bindings().unwrap();
    assert!(matches!(results.next_binding(), Err(QueryError::Storage(_))));
    results.close();
    assert!(handler.graph().stats().injected_errors >= 1);
}

#[test]
fn test_direct_lookups_propagate() {
    let handler = failing(FaultConfig::failing_finds());
    assert!(handler.objects_for(None, None).is_err());
    assert!(handler.subjects_for(None, None).is_err());
    assert!(handler.contains_node(&uri("a")).is_err());
    assert!(handler.is_empty().is_err());
}

/// Faults are seeded: a partial fault rate fails the same way every run.
#[test]
fn test_partial_faults_are_deterministic() {
    let outcome = || {
        let config = FaultConfig {
            find_error_rate: 0.0,
            read_error_rate: 0.3,
        };
        let handler = failing(config);
        let query = Query::new()
            .where_pattern(t(var("s"), "p", var("o")))
            .where_pattern(t(var("o"), "q", var("z")));
        let plan = handler.prepare_bindings(&query, &vars(&["s", "o", "z"])).unwrap();
        collect_bindings(plan.execute_bindings().unwrap())
            .map(|r| r.len())
            .map_err(|e| e.to_string())
    };
    let first = outcome();
    for _ in 0..3 {
        assert_eq!(outcome(), first);
    }
}
