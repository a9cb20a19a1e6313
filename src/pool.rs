//! A stack-style object pool with growth, prewarm, and lifecycle hooks.
//!
//! Grounded on the teacher's `daq-pool::Pool<T>` (`crates/daq-pool/src/lib.rs`
//! in the retrieval pack): the same `factory`/`reset` split, the same
//! doubling-on-exhaustion growth policy, the same `tracing::warn!` on
//! growth. What's dropped relative to the teacher is everything that
//! exists there purely for cross-thread access — `Semaphore`, `SegQueue`,
//! `UnsafeCell`, `Arc` — because this spec rules out concurrent access to
//! one pool (see `SPEC_FULL.md` §5); a plain `Vec`-backed stack is
//! sufficient and simpler.

use crate::error::{GridForgeError, Result};
use std::any::type_name;

/// The capability set governing a pooled instance's lifecycle.
///
/// A bare factory closure (`FnMut() -> T`) is the degenerate case that
/// only implements [`PoolCreator::on_create`] — see [`ObjectPool::with_factory`].
pub trait PoolCreator<T> {
    /// Construct a brand-new instance. Never called through
    /// [`PoolCreator::on_acquire`] — a freshly created instance is handed
    /// to the caller as-is.
    fn on_create(&mut self) -> T;

    /// Called when an instance is popped off the dormant stack and handed
    /// to a caller.
    fn on_acquire(&mut self, _item: &mut T) {}

    /// Called when an instance is pushed back onto the dormant stack.
    fn on_return(&mut self, _item: &mut T) {}

    /// Called once per instance when the pool is cleared or disposed.
    fn on_dispose(&mut self, _item: T) {}
}

pub(crate) struct FactoryCreator<F>(pub(crate) F);

impl<T, F> PoolCreator<T> for FactoryCreator<F>
where
    F: FnMut() -> T,
{
    fn on_create(&mut self) -> T {
        (self.0)()
    }
}

struct DefaultCreator;

impl<T: Default> PoolCreator<T> for DefaultCreator {
    fn on_create(&mut self) -> T {
        T::default()
    }
}

/// A stack of dormant instances with growth, prewarm, and lifecycle hooks.
///
/// `available` (the number of dormant instances currently held) is always
/// `<= size` (the pool's current total capacity); `size` only ever grows,
/// starting at a clamped `initial_capacity` and exactly doubling whenever
/// [`ObjectPool::release`] finds the stack full.
///
/// The pool always holds a [`PoolCreator`] — [`ObjectPool::new`] installs
/// one that falls back to `T::default()`, so only that bare constructor
/// needs a `T: Default` bound. Every other constructor, and every method
/// below, works for any `T`, including domain types with no sensible
/// default that are only ever produced by a [`PoolCreator`].
pub struct ObjectPool<T> {
    slots: Vec<T>,
    size: usize,
    initial_capacity: usize,
    creator: Box<dyn PoolCreator<T> + Send>,
    disposed: bool,
}

impl<T: Default> ObjectPool<T> {
    /// A pool with no creator or factory: empty-pool acquisitions fall
    /// back to `T::default()`.
    pub fn new(capacity: usize) -> Self {
        Self::new_inner(capacity, Box::new(DefaultCreator))
    }
}

impl<T> ObjectPool<T> {
    /// A pool whose empty-pool acquisitions and growth are driven by a
    /// bare factory closure.
    pub fn with_factory<F>(capacity: usize, factory: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::new_inner(capacity, Box::new(FactoryCreator(factory)))
    }

    /// A pool whose full lifecycle (create/acquire/return/dispose) is
    /// driven by a [`PoolCreator`].
    pub fn with_creator<C>(capacity: usize, creator: C) -> Self
    where
        C: PoolCreator<T> + Send + 'static,
    {
        Self::new_inner(capacity, Box::new(creator))
    }

    /// Like [`ObjectPool::with_creator`], additionally pre-populating the
    /// pool to `capacity` dormant instances immediately.
    pub fn with_creator_prewarmed<C>(capacity: usize, creator: C) -> Self
    where
        C: PoolCreator<T> + Send + 'static,
    {
        let mut pool = Self::with_creator(capacity, creator);
        pool.prewarm();
        pool
    }

    pub(crate) fn new_inner(capacity: usize, creator: Box<dyn PoolCreator<T> + Send>) -> Self {
        let capacity =
            capacity.max(crate::config::EngineConfig::global().pool_minimum_capacity);
        Self {
            slots: Vec::with_capacity(capacity),
            size: capacity,
            initial_capacity: capacity,
            creator,
            disposed: false,
        }
    }

    /// Current total capacity.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of dormant instances currently held.
    pub fn available(&self) -> usize {
        self.slots.len()
    }

    /// `true` iff `available == 0`.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` iff `available == size`.
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.size
    }

    /// Pop a dormant instance and run [`PoolCreator::on_acquire`] on it,
    /// or create a fresh instance (never passed through `on_acquire`) if
    /// the pool is empty.
    pub fn acquire(&mut self) -> T {
        match self.slots.pop() {
            Some(mut item) => {
                self.creator.on_acquire(&mut item);
                item
            }
            None => self.creator.on_create(),
        }
    }

    /// Run [`PoolCreator::on_return`] on `item` and push it onto the
    /// dormant stack, doubling capacity first if the stack is already
    /// full.
    pub fn release(&mut self, mut item: T) {
        self.creator.on_return(&mut item);
        if self.slots.len() >= self.size {
            self.grow();
        }
        self.slots.push(item);
    }

    fn grow(&mut self) {
        let old_size = self.size;
        self.size *= 2;
        tracing::warn!(
            pool_type = type_name::<T>(),
            old_size,
            new_size = self.size,
            "object pool exhausted, doubling capacity"
        );
    }

    /// While `available < n`, create and release a new instance. Grows
    /// capacity to `n` first if `n` exceeds the current `size`.
    pub fn prewarm_to(&mut self, n: usize) {
        if n > self.size {
            self.size = n;
        }
        while self.slots.len() < n {
            let item = self.creator.on_create();
            self.release(item);
        }
    }

    /// [`ObjectPool::prewarm_to`] targeting the current `size`.
    pub fn prewarm(&mut self) {
        self.prewarm_to(self.size);
    }

    /// Run [`PoolCreator::on_dispose`] on every dormant instance and empty
    /// the stack. If `shrink`, reallocate to the initial capacity.
    pub fn clear(&mut self, shrink: bool) {
        for item in self.slots.drain(..) {
            self.creator.on_dispose(item);
        }
        if shrink {
            self.size = self.initial_capacity;
            self.slots = Vec::with_capacity(self.initial_capacity);
        }
    }

    /// Equivalent to `clear(false)` plus marking the pool unusable for
    /// further acquisitions, emitting one disposal event.
    ///
    /// # Errors
    ///
    /// Returns [`GridForgeError::AlreadyDisposed`] if called twice.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Err(GridForgeError::AlreadyDisposed);
        }
        self.clear(false);
        self.disposed = true;
        tracing::debug!(pool_type = type_name::<T>(), "object pool disposed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_starts_empty_but_not_full() {
        let pool: ObjectPool<i32> = ObjectPool::new(4);
        assert!(pool.is_empty());
        assert!(!pool.is_full());
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn capacity_clamps_to_minimum_four() {
        let pool: ObjectPool<i32> = ObjectPool::new(1);
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn acquire_without_creator_uses_default() {
        let mut pool: ObjectPool<i32> = ObjectPool::new(4);
        assert_eq!(pool.acquire(), 0);
    }

    #[test]
    fn acquire_with_factory_uses_factory() {
        let mut pool = ObjectPool::with_factory(4, || 42i32);
        assert_eq!(pool.acquire(), 42);
    }

    #[test]
    fn release_then_acquire_reuses_instance() {
        let mut pool: ObjectPool<Vec<i32>> = ObjectPool::new(4);
        let mut item = pool.acquire();
        item.push(1);
        pool.release(item);
        assert_eq!(pool.available(), 1);
        let reused = pool.acquire();
        assert_eq!(reused, vec![1]);
    }

    #[test]
    fn release_past_capacity_doubles_size() {
        // E5: capacity 4, release 6 times -> size 8, available 6.
        let mut pool = ObjectPool::with_factory(4, || 0i32);
        for i in 0..6 {
            pool.release(i);
        }
        assert_eq!(pool.size(), 8);
        assert_eq!(pool.available(), 6);
    }

    #[test]
    fn prewarm_populates_available() {
        let mut pool = ObjectPool::with_factory(4, || 7i32);
        pool.prewarm();
        assert_eq!(pool.available(), 4);
    }

    #[test]
    fn prewarm_beyond_size_grows_first() {
        let mut pool = ObjectPool::with_factory(4, || 7i32);
        pool.prewarm_to(10);
        assert_eq!(pool.size(), 10);
        assert_eq!(pool.available(), 10);
    }

    #[test]
    fn clear_without_shrink_keeps_capacity() {
        let mut pool = ObjectPool::with_factory(4, || 1i32);
        pool.prewarm();
        pool.clear(false);
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn clear_with_shrink_resets_to_initial_capacity() {
        let mut pool = ObjectPool::with_factory(4, || 1i32);
        pool.prewarm_to(10);
        pool.clear(true);
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn on_return_hook_runs_before_storage() {
        struct ResetToZero;
        impl PoolCreator<i32> for ResetToZero {
            fn on_create(&mut self) -> i32 {
                1
            }
            fn on_return(&mut self, item: &mut i32) {
                *item = 0;
            }
        }
        let mut pool = ObjectPool::with_creator(4, ResetToZero);
        pool.release(99);
        assert_eq!(pool.acquire(), 0);
    }

    #[test]
    fn dispose_twice_errors() {
        let mut pool: ObjectPool<i32> = ObjectPool::new(4);
        pool.dispose().unwrap();
        assert!(pool.dispose().is_err());
    }

    #[test]
    fn dispose_runs_on_dispose_for_every_held_instance() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct CountDisposals(Rc<RefCell<usize>>);
        impl PoolCreator<i32> for CountDisposals {
            fn on_create(&mut self) -> i32 {
                0
            }
            fn on_dispose(&mut self, _item: i32) {
                *self.0.borrow_mut() += 1;
            }
        }

        let count = Rc::new(RefCell::new(0));
        let mut pool = ObjectPool::with_creator(4, CountDisposals(count.clone()));
        pool.prewarm();
        pool.dispose().unwrap();
        assert_eq!(*count.borrow(), 4);
    }

    #[test]
    fn pool_of_a_non_default_type_works_through_a_creator() {
        // No `Default` impl on this type at all — only reachable through
        // `with_creator`/`with_factory`, never `ObjectPool::new`.
        struct NoDefault(i32);
        let mut pool = ObjectPool::with_factory(4, || NoDefault(7));
        assert_eq!(pool.acquire().0, 7);
    }
}
