//! Matching of patterns that contain triple terms.
//!
//! There are two entry points:
//!
//! - [`rdf_star_triple`] matches one pattern triple whose subject and object
//!   may hold triple terms, nested to any depth.
//! - [`match_triple_star`] matches a pattern triple and binds the matched
//!   triple itself to a variable (`FIND(<< ... >> AS ?t)`).
//!
//! A pattern with a triple term is rewritten before it reaches storage: each
//! triple term in subject or object position is matched first, its matched
//! triple bound to a fresh synthetic variable, and the variable put in its
//! place. The rewritten outer pattern is then matched as a flat pattern.
//! Each nesting level adds one synthetic variable and one storage stage per
//! triple term. A wildcard inside a triple term, or in a pattern bound
//! through [`match_triple_star`], also gets its own synthetic variable, so
//! every matched triple is fully ground.
//!
//! Triple terms in predicate position are not supported and are rejected.

use crate::query::context::ExecutionContext;
use crate::query::error::{PatternError, QueryError};
use crate::query::iterator::{BoxedQueryIterator, QueryIterAddTripleTerm};
use crate::types::{Node, Triple, Var};

/// Match a single triple pattern that may involve triple terms.
///
/// Without triple terms this is exactly one flat storage stage.
pub fn rdf_star_triple<'a>(
    chain: BoxedQueryIterator<'a>,
    triple: &Triple,
    ctx: &mut ExecutionContext<'a>,
) -> Result<BoxedQueryIterator<'a>, QueryError> {
    reject_predicate_triple_term(triple)?;
    if !triple.has_triple_term() {
        return Ok(match_data(chain, triple, ctx));
    }
    let (chain, flat) = preprocess_for_triple_terms(chain, triple, ctx, 1)?;
    Ok(match_data(chain, &flat, ctx))
}

/// Match a triple pattern (which may itself hold triple terms) and bind each
/// matched triple to `var`.
pub fn match_triple_star<'a>(
    chain: BoxedQueryIterator<'a>,
    var: &Var,
    triple: &Triple,
    ctx: &mut ExecutionContext<'a>,
) -> Result<BoxedQueryIterator<'a>, QueryError> {
    match_triple_star_at(chain, var, triple, ctx, 0)
}

/// `level` is how deeply `triple` itself is nested inside the outermost
/// pattern.
fn match_triple_star_at<'a>(
    chain: BoxedQueryIterator<'a>,
    var: &Var,
    triple: &Triple,
    ctx: &mut ExecutionContext<'a>,
    level: usize,
) -> Result<BoxedQueryIterator<'a>, QueryError> {
    reject_predicate_triple_term(triple)?;
    let triple = name_wildcards(triple, ctx)?;
    if triple.has_triple_term() {
        let (chain, flat) = preprocess_for_triple_terms(chain, &triple, ctx, level + 1)?;
        Ok(bind_triple_term(chain, var, flat, ctx))
    } else {
        Ok(bind_triple_term(chain, var, triple, ctx))
    }
}

/// Replace each wildcard position of `triple` with its own synthetic
/// variable, so the matched triple is always fully ground.
fn name_wildcards(triple: &Triple, ctx: &mut ExecutionContext<'_>) -> Result<Triple, QueryError> {
    let mut name = |node: &Node| -> Result<Node, QueryError> {
        if node.is_any() {
            Ok(Node::Variable(ctx.alloc_var()?))
        } else {
            Ok(node.clone_value())
        }
    };
    Ok(Triple::new(
        name(&triple.subject)?,
        name(&triple.predicate)?,
        name(&triple.object)?,
    ))
}

/// Add the stages for the triple terms directly inside `pattern`, and
/// return the pattern with each of them replaced by its synthetic variable.
///
/// `level` is the nesting level of the triple terms being replaced.
fn preprocess_for_triple_terms<'a>(
    chain: BoxedQueryIterator<'a>,
    pattern: &Triple,
    ctx: &mut ExecutionContext<'a>,
    level: usize,
) -> Result<(BoxedQueryIterator<'a>, Triple), QueryError> {
    let limit = ctx.config().max_triple_term_depth;
    if level > limit {
        return Err(PatternError::NestingTooDeep {
            depth: level + pattern.triple_term_depth() - 1,
            limit,
        }
        .into());
    }

    let (chain, subject) = replace_triple_term(chain, &pattern.subject, ctx, level)?;
    let (chain, object) = replace_triple_term(chain, &pattern.object, ctx, level)?;
    let flat = Triple::new(subject, pattern.predicate.clone_value(), object);
    tracing::debug!("rewrote {pattern} as {flat}");
    Ok((chain, flat))
}

fn replace_triple_term<'a>(
    chain: BoxedQueryIterator<'a>,
    node: &Node,
    ctx: &mut ExecutionContext<'a>,
    level: usize,
) -> Result<(BoxedQueryIterator<'a>, Node), QueryError> {
    let Node::Triple(inner) = node else {
        return Ok((chain, node.clone_value()));
    };
    let var = ctx.alloc_var()?;
    let chain = match_triple_star_at(chain, &var, inner, ctx, level)?;
    Ok((chain, Node::Variable(var)))
}

/// Match `pattern` against storage and bind the grounded triple to `var`.
fn bind_triple_term<'a>(
    chain: BoxedQueryIterator<'a>,
    var: &Var,
    pattern: Triple,
    ctx: &mut ExecutionContext<'a>,
) -> BoxedQueryIterator<'a> {
    let matched = match_data(chain, &pattern, ctx);
    ctx.note_bound(var);
    Box::new(QueryIterAddTripleTerm::new(matched, var.clone_value(), pattern))
}

/// Match the graph with a flat triple pattern.
fn match_data<'a>(
    chain: BoxedQueryIterator<'a>,
    pattern: &Triple,
    ctx: &mut ExecutionContext<'a>,
) -> BoxedQueryIterator<'a> {
    ctx.pattern_stage(std::slice::from_ref(pattern)).deliver(chain)
}

const fn reject_predicate_triple_term(triple: &Triple) -> Result<(), PatternError> {
    if triple.predicate.is_triple_term() {
        return Err(PatternError::TripleTermInPredicate);
    }
    Ok(())
}
