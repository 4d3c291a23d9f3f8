//! Lazy, pull-based binding streams.
//!
//! Every stage of a query is a `QueryIterator`. Iterators own their input
//! iterator and any storage cursor they opened, so a pipeline is a chain of
//! boxed iterators ending at a `QueryIterSingleton` holding the initial
//! binding.
//!
//! # Lifecycle
//!
//! 1. `next_binding()` - pull until it returns `Ok(None)`
//! 2. `close()` - release storage cursors held anywhere upstream
//!
//! Pulling from a closed iterator is an error. Closing is idempotent and may
//! happen at any point. Dropping an iterator without closing it frees its
//! memory but skips the backend's cursor release; callers that stop pulling
//! early must call `close`.

use crate::query::binding::Binding;
use crate::query::error::QueryError;
use crate::storage::{BoxedTripleCursor, Graph};
use crate::types::{Node, Triple, Var};

/// A lazy stream of bindings.
pub trait QueryIterator {
    /// Pull the next binding, or `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::IteratorClosed` after `close`, and propagates any
    /// storage failure unchanged.
    fn next_binding(&mut self) -> Result<Option<Binding>, QueryError>;

    /// Release all resources held by this iterator and its inputs.
    fn close(&mut self);
}

/// Boxed iterator for dynamic dispatch.
pub type BoxedQueryIterator<'a> = Box<dyn QueryIterator + 'a>;

/// Iterator state for lifecycle tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    /// Producing bindings.
    Open,
    /// End of stream reached.
    Exhausted,
    /// Closed by the consumer.
    Closed,
}

impl IterState {
    /// Check whether a pull may proceed.
    ///
    /// Returns `Ok(false)` when the stream is exhausted.
    pub const fn check_pull(self) -> Result<bool, QueryError> {
        match self {
            Self::Open => Ok(true),
            Self::Exhausted => Ok(false),
            Self::Closed => Err(QueryError::IteratorClosed),
        }
    }
}

/// Drain an iterator into a vector and close it.
///
/// The iterator is closed on error as well.
pub fn collect_bindings(mut iter: BoxedQueryIterator<'_>) -> Result<Vec<Binding>, QueryError> {
    let mut bindings = Vec::new();
    loop {
        match iter.next_binding() {
            Ok(Some(binding)) => bindings.push(binding),
            Ok(None) => break,
            Err(e) => {
                iter.close();
                return Err(e);
            }
        }
    }
    iter.close();
    Ok(bindings)
}

/// A stream of exactly one binding. The root of every pipeline.
pub struct QueryIterSingleton {
    binding: Option<Binding>,
    state: IterState,
}

impl QueryIterSingleton {
    /// Create a stream holding one binding.
    #[must_use]
    pub const fn new(binding: Binding) -> Self {
        Self {
            binding: Some(binding),
            state: IterState::Open,
        }
    }

    /// Create a boxed stream holding one empty binding.
    #[must_use]
    pub fn root<'a>() -> BoxedQueryIterator<'a> {
        Box::new(Self::new(Binding::new()))
    }
}

impl QueryIterator for QueryIterSingleton {
    fn next_binding(&mut self) -> Result<Option<Binding>, QueryError> {
        if !self.state.check_pull()? {
            return Ok(None);
        }
        let binding = self.binding.take();
        if binding.is_none() {
            self.state = IterState::Exhausted;
        }
        Ok(binding)
    }

    fn close(&mut self) {
        self.binding = None;
        self.state = IterState::Closed;
    }
}

/// For each input binding, run a step producing a sub-stream, and
/// concatenate the sub-streams.
///
/// This is the composition primitive: any stage that turns one binding into
/// zero or more bindings can be chained onto a pipeline with it. The step is
/// only invoked when a binding is pulled.
pub struct QueryIterRepeatApply<'a, F>
where
    F: FnMut(Binding) -> Result<BoxedQueryIterator<'a>, QueryError>,
{
    input: BoxedQueryIterator<'a>,
    current: Option<BoxedQueryIterator<'a>>,
    step: F,
    state: IterState,
}

impl<'a, F> QueryIterRepeatApply<'a, F>
where
    F: FnMut(Binding) -> Result<BoxedQueryIterator<'a>, QueryError>,
{
    /// Chain `step` onto `input`.
    pub const fn new(input: BoxedQueryIterator<'a>, step: F) -> Self {
        Self {
            input,
            current: None,
            step,
            state: IterState::Open,
        }
    }
}

impl<'a, F> QueryIterator for QueryIterRepeatApply<'a, F>
where
    F: FnMut(Binding) -> Result<BoxedQueryIterator<'a>, QueryError>,
{
    fn next_binding(&mut self) -> Result<Option<Binding>, QueryError> {
        if !self.state.check_pull()? {
            return Ok(None);
        }
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(binding) = current.next_binding()? {
                    return Ok(Some(binding));
                }
                current.close();
                self.current = None;
            }

            let Some(binding) = self.input.next_binding()? else {
                self.state = IterState::Exhausted;
                return Ok(None);
            };
            self.current = Some((self.step)(binding)?);
        }
    }

    fn close(&mut self) {
        if self.state == IterState::Closed {
            return;
        }
        if let Some(current) = self.current.as_mut() {
            current.close();
        }
        self.current = None;
        self.input.close();
        self.state = IterState::Closed;
    }
}

/// One storage lookup in flight: the input binding, the pattern with that
/// binding substituted, and the open cursor.
struct Lookup<'a> {
    binding: Binding,
    pattern: Triple,
    cursor: BoxedTripleCursor<'a>,
}

/// Match one triple pattern against storage for every input binding.
///
/// Each input binding is substituted into the pattern; positions that are
/// then concrete become lookup keys, the rest are wildcards. Every stored
/// triple that unifies with the substituted pattern yields the input binding
/// extended with the new assignments. An input that matches nothing yields
/// nothing.
pub struct QueryIterTriplePattern<'a> {
    input: BoxedQueryIterator<'a>,
    graph: &'a dyn Graph,
    pattern: Triple,
    lookup: Option<Lookup<'a>>,
    state: IterState,
}

impl<'a> QueryIterTriplePattern<'a> {
    /// Chain a storage match for `pattern` onto `input`.
    #[must_use]
    pub const fn new(input: BoxedQueryIterator<'a>, graph: &'a dyn Graph, pattern: Triple) -> Self {
        Self {
            input,
            graph,
            pattern,
            lookup: None,
            state: IterState::Open,
        }
    }
}

impl QueryIterator for QueryIterTriplePattern<'_> {
    fn next_binding(&mut self) -> Result<Option<Binding>, QueryError> {
        if !self.state.check_pull()? {
            return Ok(None);
        }
        loop {
            if let Some(lookup) = self.lookup.as_mut() {
                while let Some(triple) = lookup.cursor.next_triple()? {
                    if let Some(binding) = unify_triple(&lookup.pattern, &triple, &lookup.binding) {
                        return Ok(Some(binding));
                    }
                }
                lookup.cursor.close();
                self.lookup = None;
            }

            let Some(binding) = self.input.next_binding()? else {
                self.state = IterState::Exhausted;
                return Ok(None);
            };
            let pattern = binding.substitute(&self.pattern);
            let cursor = self.graph.find(
                pattern.subject.as_lookup(),
                pattern.predicate.as_lookup(),
                pattern.object.as_lookup(),
            )?;
            self.lookup = Some(Lookup {
                binding,
                pattern,
                cursor,
            });
        }
    }

    fn close(&mut self) {
        if self.state == IterState::Closed {
            return;
        }
        if let Some(lookup) = self.lookup.as_mut() {
            lookup.cursor.close();
        }
        self.lookup = None;
        self.input.close();
        self.state = IterState::Closed;
    }
}

/// Extend `binding` so that `pattern` equals `data`, if possible.
fn unify_triple(pattern: &Triple, data: &Triple, binding: &Binding) -> Option<Binding> {
    let mut extended = binding.clone_value();
    let ok = unify_node(&pattern.subject, &data.subject, &mut extended)
        && unify_node(&pattern.predicate, &data.predicate, &mut extended)
        && unify_node(&pattern.object, &data.object, &mut extended);
    ok.then_some(extended)
}

fn unify_node(pattern: &Node, data: &Node, binding: &mut Binding) -> bool {
    match (pattern, data) {
        (Node::Any, _) => true,
        (Node::Variable(v), _) => binding.bind(v, data.clone_value()),
        (Node::Triple(p), Node::Triple(d)) => unify_triple_in_place(p, d, binding),
        _ => pattern == data,
    }
}

fn unify_triple_in_place(pattern: &Triple, data: &Triple, binding: &mut Binding) -> bool {
    unify_node(&pattern.subject, &data.subject, binding)
        && unify_node(&pattern.predicate, &data.predicate, binding)
        && unify_node(&pattern.object, &data.object, binding)
}

/// Bind a variable to the triple each input binding grounds a pattern to.
///
/// For every input binding the pattern is substituted:
/// - not concrete: the binding passes through unchanged
/// - variable unbound: the binding is extended with `var = << triple >>`
/// - variable bound to the same triple: the binding passes through
/// - variable bound to anything else: the binding is dropped
pub struct QueryIterAddTripleTerm<'a> {
    input: BoxedQueryIterator<'a>,
    var: Var,
    pattern: Triple,
    state: IterState,
}

impl<'a> QueryIterAddTripleTerm<'a> {
    /// Chain the assignment of `var` onto `input`.
    #[must_use]
    pub const fn new(input: BoxedQueryIterator<'a>, var: Var, pattern: Triple) -> Self {
        Self {
            input,
            var,
            pattern,
            state: IterState::Open,
        }
    }
}

impl QueryIterator for QueryIterAddTripleTerm<'_> {
    fn next_binding(&mut self) -> Result<Option<Binding>, QueryError> {
        if !self.state.check_pull()? {
            return Ok(None);
        }
        loop {
            let Some(mut binding) = self.input.next_binding()? else {
                self.state = IterState::Exhausted;
                return Ok(None);
            };
            let matched = binding.substitute(&self.pattern);
            if !matched.is_concrete() {
                return Ok(Some(binding));
            }
            if binding.bind(&self.var, Node::triple(matched)) {
                return Ok(Some(binding));
            }
            tracing::trace!("dropping binding: {} already bound to another value", self.var);
        }
    }

    fn close(&mut self) {
        if self.state == IterState::Closed {
            return;
        }
        self.input.close();
        self.state = IterState::Closed;
    }
}

/// Restrict every binding to a fixed list of variables.
pub struct QueryIterProject<'a> {
    input: BoxedQueryIterator<'a>,
    vars: Vec<Var>,
    state: IterState,
}

impl<'a> QueryIterProject<'a> {
    /// Project `input` onto `vars`.
    #[must_use]
    pub const fn new(input: BoxedQueryIterator<'a>, vars: Vec<Var>) -> Self {
        Self {
            input,
            vars,
            state: IterState::Open,
        }
    }
}

impl QueryIterator for QueryIterProject<'_> {
    fn next_binding(&mut self) -> Result<Option<Binding>, QueryError> {
        if !self.state.check_pull()? {
            return Ok(None);
        }
        let Some(binding) = self.input.next_binding()? else {
            self.state = IterState::Exhausted;
            return Ok(None);
        };
        Ok(Some(binding.project(&self.vars)))
    }

    fn close(&mut self) {
        if self.state == IterState::Closed {
            return;
        }
        self.input.close();
        self.state = IterState::Closed;
    }
}
