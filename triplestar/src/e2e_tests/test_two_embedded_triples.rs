//! Test patterns with triple terms in both subject and object position.

use crate::e2e_tests::helpers::{quoted, resolve, run_query, t, uri, user_binding_set, var};
use crate::handler::SimpleQueryHandler;
use crate::query::Query;
use crate::storage::MemoryGraph;
use crate::testing::init_tracing;
use crate::types::Var;

fn implication_graph() -> MemoryGraph {
    MemoryGraph::from_triples([
        t(uri("a"), "p", uri("b")),
        t(uri("b"), "q", uri("c")),
        t(uri("e"), "p", uri("f")),
        t(quoted(uri("a"), "p", uri("b")), "implies", quoted(uri("b"), "q", uri("c"))),
    ])
}

/// One satisfying assignment per embedded triple collapses to a single
/// overall binding, using two distinct synthetic variables.
#[test]
fn test_cross_product_collapses() {
    init_tracing();
    let handler = SimpleQueryHandler::new(implication_graph());
    let pattern = t(
        quoted(var("s"), "p", var("x")),
        "implies",
        quoted(var("x"), "q", var("y")),
    );

    let (results, allocated) = resolve(&handler, &pattern);
    assert_eq!(allocated, 2);
    assert_eq!(results.len(), 1);
    let binding = &results[0];
    assert_eq!(binding.get(&Var::new("s")), Some(&uri("a")));
    assert_eq!(binding.get(&Var::new("x")), Some(&uri("b")));
    assert_eq!(binding.get(&Var::new("y")), Some(&uri("c")));
    assert_ne!(binding.get(&Var::new("~t0")), binding.get(&Var::new("~t1")));

    let query = Query::new().where_pattern(pattern);
    assert_eq!(run_query(&handler, &query, &["s", "x", "y"]).len(), 1);
}

/// The synthetic variable count does not depend on which side is matched
/// first: mirroring the pattern allocates the same number.
#[test]
fn test_allocation_independent_of_side() {
    init_tracing();
    let graph = MemoryGraph::from_triples([
        t(uri("a"), "p", uri("b")),
        t(uri("b"), "q", uri("c")),
        t(quoted(uri("a"), "p", uri("b")), "implies", quoted(uri("b"), "q", uri("c"))),
        t(quoted(uri("b"), "q", uri("c")), "impliedBy", quoted(uri("a"), "p", uri("b"))),
    ]);
    let handler = SimpleQueryHandler::new(graph);

    let forward = t(
        quoted(var("s"), "p", var("x")),
        "implies",
        quoted(var("x"), "q", var("y")),
    );
    let backward = t(
        quoted(var("x"), "q", var("y")),
        "impliedBy",
        quoted(var("s"), "p", var("x")),
    );

    let (forward_results, forward_allocated) = resolve(&handler, &forward);
    let (backward_results, backward_allocated) = resolve(&handler, &backward);
    assert_eq!(forward_allocated, 2);
    assert_eq!(backward_allocated, 2);
    assert_eq!(
        user_binding_set(&forward_results),
        user_binding_set(&backward_results)
    );
}
