//! Test binding a matched triple to a variable (`FIND(<< ... >> AS ?t)`).

use crate::e2e_tests::helpers::{example_handler, quoted, run_query, t, uri, var};
use crate::query::Query;
use crate::types::Var;

#[test]
fn test_bind_matched_triple() {
    let handler = example_handler();
    let query = Query::new().bind_triple_term("t", t(var("s"), "q", var("o")));
    let results = run_query(&handler, &query, &["t", "s"]);

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].get(&Var::new("t")),
        Some(&quoted(uri("b"), "q", uri("c")))
    );
    assert_eq!(results[0].get(&Var::new("s")), Some(&uri("b")));
}

/// The assigned triple joins with a where pattern using it as a subject.
#[test]
fn test_assigned_triple_joins_where_pattern() {
    let handler = example_handler();
    let query = Query::new()
        .where_pattern(t(var("t"), "r", var("v")))
        .bind_triple_term("t", t(uri("a"), "p", var("x")));
    let results = run_query(&handler, &query, &["t", "x", "v"]);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get(&Var::new("x")), Some(&uri("b")));
    assert_eq!(results[0].get(&Var::new("v")), Some(&uri("d")));
}

/// An already bound variable that disagrees with the matched triple drops
/// the binding.
#[test]
fn test_conflicting_assignment_drops_binding() {
    let handler = example_handler();
    let query = Query::new()
        .where_pattern(t(var("t"), "r", var("v")))
        .bind_triple_term("t", t(var("s"), "q", var("o")));
    assert!(run_query(&handler, &query, &["t", "s", "o"]).is_empty());
}

/// The assigned pattern may itself contain a triple term.
#[test]
fn test_assign_nested_pattern() {
    let handler = example_handler();
    let query = Query::new().bind_triple_term("ann", t(quoted(uri("a"), "p", var("x")), "r", var("v")));
    let results = run_query(&handler, &query, &["ann", "x"]);

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].get(&Var::new("ann")),
        Some(&quoted(quoted(uri("a"), "p", uri("b")), "r", uri("d")))
    );
}
