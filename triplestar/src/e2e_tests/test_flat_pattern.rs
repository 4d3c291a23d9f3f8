//! Test flat patterns and their equivalence with a single stage.

use crate::e2e_tests::helpers::{binding_set, example_handler, resolve, run_query, t, uri, var};
use crate::handler::QueryHandler;
use crate::query::{ConstraintGraph, Mapping, Query, QueryIterSingleton, collect_bindings};
use crate::types::{Triple, Var};

/// Storage holds (a,p,b), (b,q,c). Pattern (a,p,?x) yields exactly ?x=b.
#[test]
fn test_flat_pattern_single_binding() {
    let handler = example_handler();
    let query = Query::new().where_pattern(t(uri("a"), "p", var("x")));
    let results = run_query(&handler, &query, &["x"]);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get(&Var::new("x")), Some(&uri("b")));
    assert_eq!(results[0].len(), 1);
}

/// A fully ground pattern acts as a filter.
#[test]
fn test_ground_pattern_filters() {
    let handler = example_handler();

    let present = Query::new()
        .where_pattern(t(uri("a"), "p", var("x")))
        .where_pattern(t(var("x"), "q", uri("c")));
    assert_eq!(run_query(&handler, &present, &["x"]).len(), 1);

    let absent = Query::new()
        .where_pattern(t(uri("a"), "p", var("x")))
        .where_pattern(t(uri("a"), "q", uri("c")));
    assert!(run_query(&handler, &absent, &["x"]).is_empty());
}

/// Without triple terms the resolver output equals one stage's output and
/// no synthetic variable is allocated.
#[test]
fn test_resolver_equals_flat_stage() {
    let handler = example_handler();
    let patterns: Vec<Triple> = vec![
        t(uri("a"), "p", var("x")),
        t(var("s"), "q", var("o")),
        t(var("s"), "p", var("o")),
        t(uri("zzz"), "p", var("x")),
        t(uri("b"), "q", uri("c")),
    ];

    for pattern in &patterns {
        let (resolved, allocated) = resolve(&handler, pattern);
        assert_eq!(allocated, 0, "{pattern}");

        let stage = handler.pattern_stage(
            &mut Mapping::new(),
            &mut ConstraintGraph::new(),
            std::slice::from_ref(pattern),
        );
        let flat = collect_bindings(stage.deliver(QueryIterSingleton::root())).unwrap();
        assert_eq!(binding_set(&resolved), binding_set(&flat), "{pattern}");
    }
}

/// A variable repeated across positions must match the same node.
#[test]
fn test_repeated_variable() {
    let handler = example_handler();
    let query = Query::new().where_pattern(t(var("x"), "p", var("x")));
    assert!(run_query(&handler, &query, &["x"]).is_empty());
}
