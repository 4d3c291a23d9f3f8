//! Test that re-executing a prepared plan yields the same results.

use crate::e2e_tests::helpers::{binding_set, example_handler, quoted, t, uri, var, vars};
use crate::handler::QueryHandler;
use crate::query::{Query, collect_bindings};

#[test]
fn test_reexecution_yields_same_set() {
    let handler = example_handler();
    let query = Query::new()
        .where_pattern(t(quoted(var("s"), "p", var("x")), "r", var("v")))
        .where_pattern(t(var("x"), "q", var("y")));
    let plan = handler
        .prepare_bindings(&query, &vars(&["s", "x", "y", "v"]))
        .unwrap();

    let first = collect_bindings(plan.execute_bindings().unwrap()).unwrap();
    assert_eq!(first.len(), 1);
    for _ in 0..3 {
        let again = collect_bindings(plan.execute_bindings().unwrap()).unwrap();
        assert_eq!(binding_set(&first), binding_set(&again));
    }
}

/// Executions are independent: an abandoned, closed execution does not
/// disturb the next one.
#[test]
fn test_interleaved_executions() {
    let handler = example_handler();
    let query = Query::new().where_pattern(t(quoted(uri("a"), "p", var("x")), "r", uri("d")));
    let plan = handler.prepare_bindings(&query, &vars(&["x"])).unwrap();

    let mut abandoned = plan.execute_bindings().unwrap();
    let full = collect_bindings(plan.execute_bindings().unwrap()).unwrap();
    abandoned.close();

    assert_eq!(full.len(), 1);
    assert_eq!(plan.result_vars(), vars(&["x"]).as_slice());
}
