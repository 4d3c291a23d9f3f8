//! Test triple terms nested more than one level deep.

use crate::e2e_tests::helpers::{quoted, resolve, run_query, t, uri, var};
use crate::handler::SimpleQueryHandler;
use crate::query::Query;
use crate::storage::MemoryGraph;
use crate::testing::init_tracing;
use crate::types::{Node, Triple, Var};

/// Build `<< a p << a p ... ?x >> >>` with `depth` levels, asserting every
/// level in storage.
fn nested_store(depth: usize) -> (MemoryGraph, Triple) {
    let mut graph = MemoryGraph::new();
    let mut stored = t(uri("a"), "p", uri("b"));
    let mut pattern = t(uri("a"), "p", var("x"));
    for _ in 0..depth {
        graph.add(stored.clone_value());
        stored = t(uri("a"), "p", Node::triple(stored));
        pattern = t(uri("a"), "p", Node::triple(pattern));
    }
    graph.add(stored);
    (graph, pattern)
}

/// Each nesting level allocates one synthetic variable.
#[test]
fn test_allocation_matches_depth() {
    init_tracing();
    for depth in 1..=4 {
        let (graph, pattern) = nested_store(depth);
        assert_eq!(pattern.triple_term_depth(), depth);
        let handler = SimpleQueryHandler::new(graph);

        let (results, allocated) = resolve(&handler, &pattern);
        assert_eq!(allocated, depth);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get(&Var::new("x")), Some(&uri("b")));
    }
}

/// Two levels, with variables at every level.
#[test]
fn test_provenance_of_a_claim() {
    init_tracing();
    let claim = t(uri("a"), "p", uri("b"));
    let statement = t(uri("alice"), "says", Node::triple(claim.clone_value()));
    let handler = SimpleQueryHandler::new(MemoryGraph::from_triples([
        claim,
        statement.clone_value(),
        t(Node::triple(statement), "source", uri("web")),
        t(uri("bob"), "says", quoted(uri("a"), "p", uri("z"))),
    ]));

    let query = Query::new().where_pattern(t(
        quoted(var("who"), "says", quoted(uri("a"), "p", var("x"))),
        "source",
        var("src"),
    ));
    let results = run_query(&handler, &query, &["who", "x", "src"]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get(&Var::new("who")), Some(&uri("alice")));
    assert_eq!(results[0].get(&Var::new("x")), Some(&uri("b")));
    assert_eq!(results[0].get(&Var::new("src")), Some(&uri("web")));
}
