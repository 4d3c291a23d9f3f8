//! Test that `is_empty` agrees with a full wildcard lookup.

use crate::e2e_tests::helpers::{t, uri};
use crate::handler::{QueryHandler, SimpleQueryHandler, collect_nodes};
use crate::storage::MemoryGraph;
use crate::testing::init_tracing;

fn assert_law(handler: &SimpleQueryHandler<MemoryGraph>) {
    let everything = collect_nodes(handler.objects_for(None, None).unwrap()).unwrap();
    assert_eq!(handler.is_empty().unwrap(), everything.is_empty());
}

#[test]
fn test_is_empty_law_through_updates() {
    init_tracing();
    let first = t(uri("a"), "p", uri("b"));
    let second = t(uri("b"), "q", uri("c"));

    let mut graph = MemoryGraph::new();
    assert_law(&SimpleQueryHandler::new(MemoryGraph::new()));
    assert!(SimpleQueryHandler::new(MemoryGraph::new()).is_empty().unwrap());

    graph.add(first.clone_value());
    graph.add(second.clone_value());
    let handler = SimpleQueryHandler::new(graph);
    assert_law(&handler);
    assert!(!handler.is_empty().unwrap());

    let mut graph = MemoryGraph::from_triples([first.clone_value(), second.clone_value()]);
    graph.remove(&first);
    let handler = SimpleQueryHandler::new(graph);
    assert_law(&handler);
    assert!(handler.contains_node(&uri("c")).unwrap());
    assert!(!handler.contains_node(&uri("a")).unwrap());

    let mut graph = MemoryGraph::from_triples([first, second.clone_value()]);
    graph.remove(&t(uri("a"), "p", uri("b")));
    graph.remove(&second);
    let handler = SimpleQueryHandler::new(graph);
    assert_law(&handler);
    assert!(handler.is_empty().unwrap());
}
