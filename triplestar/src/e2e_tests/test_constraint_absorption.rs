//! Test that stages absorbing residual constraints do not change results.

use crate::config::EngineConfig;
use crate::e2e_tests::helpers::{binding_set, quoted, run_query, t, uri, var};
use crate::handler::{QueryHandler, SimpleQueryHandler};
use crate::query::{ConstraintGraph, Mapping, Query};
use crate::storage::MemoryGraph;
use crate::testing::init_tracing;

fn graph() -> MemoryGraph {
    MemoryGraph::from_triples([
        t(uri("a"), "p", uri("b")),
        t(uri("b"), "q", uri("c")),
        t(uri("a"), "p", uri("d")),
        t(uri("d"), "q", uri("c")),
        t(uri("e"), "p", uri("b")),
        t(uri("e"), "p", uri("f")),
        t(quoted(uri("a"), "p", uri("b")), "r", uri("g")),
    ])
}

fn handlers() -> (SimpleQueryHandler<MemoryGraph>, SimpleQueryHandler<MemoryGraph>) {
    init_tracing();
    let off = EngineConfig {
        absorb_constraints: false,
        ..EngineConfig::default()
    };
    (
        SimpleQueryHandler::new(graph()),
        SimpleQueryHandler::with_config(graph(), off),
    )
}

#[test]
fn test_absorption_preserves_results() {
    let (absorbing, plain) = handlers();
    let query = Query::new()
        .where_pattern(t(var("x"), "p", var("y")))
        .where_pattern(t(var("y"), "q", uri("c")))
        .where_pattern(t(var("x"), "p", uri("b")));

    let with = run_query(&absorbing, &query, &["x", "y"]);
    let without = run_query(&plain, &query, &["x", "y"]);
    assert_eq!(with.len(), 3);
    assert_eq!(binding_set(&with), binding_set(&without));
}

#[test]
fn test_triple_term_constraints_are_not_absorbed() {
    let (absorbing, plain) = handlers();
    let query = Query::new()
        .where_pattern(t(var("x"), "p", var("y")))
        .where_pattern(t(quoted(var("x"), "p", var("y")), "r", var("g")));

    let mut mapping = Mapping::new();
    let mut constraints = ConstraintGraph::from_patterns(vec![t(
        quoted(var("x"), "p", var("y")),
        "r",
        uri("g"),
    )]);
    let _stage = absorbing.pattern_stage(
        &mut mapping,
        &mut constraints,
        &[t(var("x"), "p", var("y"))],
    );
    assert_eq!(constraints.len(), 1);

    let with = run_query(&absorbing, &query, &["x", "y", "g"]);
    let without = run_query(&plain, &query, &["x", "y", "g"]);
    assert_eq!(with.len(), 1);
    assert_eq!(binding_set(&with), binding_set(&without));
}
