//! A chain-of-responsibility dispatcher with four traversal modes.
//!
//! Grounded on the teacher's `daq-core::pipeline` `Source`/`Sink`/`Processor`
//! chaining, stripped of the async/`tokio` machinery this spec has no use
//! for: a `ChainDispatcher<C>` holds an ordered list of handlers and walks
//! them against a mutable context, the same role the teacher's pipeline
//! stages play against a sample buffer.

use crate::lru::LruCache;

/// A single link in a [`ChainDispatcher`]'s chain.
///
/// `handle` returns whether it successfully handled `ctx`. Handlers may
/// have side effects on every call, including ones that return `false` —
/// the dispatcher does not attempt to make calls idempotent on the
/// caller's behalf.
pub trait Handler<C> {
    fn handle(&mut self, ctx: &mut C) -> bool;
}

/// How a [`ChainDispatcher`] walks its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Run every handler regardless of outcome. Succeeds if any handler
    /// succeeded.
    All,
    /// Run handlers in registration order, stopping at the first success.
    First,
    /// Like [`DispatchMode::First`], but consults a small LRU cache of
    /// recently-successful handler indices first, before falling back to
    /// a full scan in registration order.
    FirstNoOrder,
    /// Run handlers in registration order, stopping (and failing) at the
    /// first handler that returns `false`.
    StopIfFail,
}

/// An ordered chain of [`Handler`]s walked according to a [`DispatchMode`].
pub struct ChainDispatcher<C> {
    handlers: Vec<Box<dyn Handler<C>>>,
    mode: DispatchMode,
    cache: LruCache<usize>,
}

impl<C> ChainDispatcher<C> {
    /// A dispatcher with [`LruCache::default`]'s configured cache capacity,
    /// relevant only in [`DispatchMode::FirstNoOrder`].
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            handlers: Vec::new(),
            mode,
            cache: LruCache::default(),
        }
    }

    pub fn with_cache_capacity(mode: DispatchMode, cache_capacity: usize) -> Self {
        Self {
            handlers: Vec::new(),
            mode,
            cache: LruCache::new(cache_capacity),
        }
    }

    /// Append a handler to the end of the chain.
    pub fn add_handler(&mut self, handler: impl Handler<C> + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Walk the chain against `ctx` according to this dispatcher's mode.
    pub fn dispatch(&mut self, ctx: &mut C) -> bool {
        match self.mode {
            DispatchMode::All => {
                let mut any = false;
                for handler in self.handlers.iter_mut() {
                    if handler.handle(ctx) {
                        any = true;
                    }
                }
                any
            }
            DispatchMode::First => self.handlers.iter_mut().any(|h| h.handle(ctx)),
            DispatchMode::StopIfFail => {
                for handler in self.handlers.iter_mut() {
                    if !handler.handle(ctx) {
                        return false;
                    }
                }
                true
            }
            DispatchMode::FirstNoOrder => self.dispatch_first_no_order(ctx),
        }
    }

    /// Try cached handler indices (most-recently-successful first), then
    /// fall back to the remaining handlers in registration order. Each
    /// handler is invoked at most once per call.
    fn dispatch_first_no_order(&mut self, ctx: &mut C) -> bool {
        let cached: Vec<usize> = self.cache.iter().copied().collect();
        let mut tried = vec![false; self.handlers.len()];
        for idx in cached {
            tried[idx] = true;
            if self.handlers[idx].handle(ctx) {
                self.cache.add(idx);
                return true;
            }
        }
        for (idx, handler) in self.handlers.iter_mut().enumerate() {
            if tried[idx] {
                continue;
            }
            if handler.handle(ctx) {
                self.cache.add(idx);
                return true;
            }
        }
        false
    }
}
