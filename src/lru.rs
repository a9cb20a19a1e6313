//! A bounded, recency-ordered cache with a predicate scan.
//!
//! Backed by an intrusive doubly-linked list over a slab (`Vec` of nodes
//! addressed by index, the same "index instead of pointer" idiom used in
//! `heap.rs` and `pool.rs`), plus a `HashMap` from value to slot index for
//! `O(1)` membership checks.

use std::collections::HashMap;
use std::hash::Hash;

struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A fixed-capacity, most-recently-used-first cache.
///
/// Traversal order (head to tail) is always most-recent to least-recent
/// access, where "access" means [`LruCache::add`], a successful
/// [`LruCache::find`], or initial insertion.
pub struct LruCache<T> {
    capacity: usize,
    slots: Vec<Node<T>>,
    index: HashMap<T, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
}

impl<T> Default for LruCache<T>
where
    T: Eq + Hash + Clone,
{
    /// Uses [`crate::config::EngineConfig::global`]'s
    /// `lru_default_capacity` (spec default 5, overridable via
    /// `GRIDFORGE_LRU_DEFAULT_CAPACITY`).
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::global().lru_default_capacity)
    }
}

impl<T> LruCache<T>
where
    T: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` distinct values.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            free: Vec::new(),
        }
    }

    /// Number of values currently cached.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` if the cache holds no values.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[slot].prev = None;
        self.slots[slot].next = None;
    }

    fn attach_at_head(&mut self, slot: usize) {
        self.slots[slot].prev = None;
        self.slots[slot].next = self.head;
        if let Some(old_head) = self.head {
            self.slots[old_head].prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.detach(slot);
        self.attach_at_head(slot);
    }

    fn evict_tail(&mut self) {
        if let Some(tail) = self.tail {
            self.detach(tail);
            self.index.remove(&self.slots[tail].value);
            self.free.push(tail);
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Node {
                value,
                prev: None,
                next: None,
            };
            slot
        } else {
            self.slots.push(Node {
                value,
                prev: None,
                next: None,
            });
            self.slots.len() - 1
        }
    }

    /// Insert `item`, or promote it to the head if already present.
    /// Evicts the least-recently-used value if this insertion pushes the
    /// cache past capacity.
    pub fn add(&mut self, item: T) {
        if let Some(&slot) = self.index.get(&item) {
            self.promote(slot);
            return;
        }
        let slot = self.alloc(item.clone());
        self.index.insert(item, slot);
        self.attach_at_head(slot);
        if self.index.len() > self.capacity {
            self.evict_tail();
        }
    }

    /// Scan head-to-tail for the first element where `predicate` returns
    /// `true`. On a hit, promotes that element to the head and returns
    /// `true`. The predicate is invoked at most once per element.
    pub fn find<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            cursor = self.slots[slot].next;
            if predicate(&self.slots[slot].value) {
                self.promote(slot);
                return true;
            }
        }
        false
    }

    /// Empty the cache.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// The most-recently-used value, if any.
    pub fn peek_head(&self) -> Option<&T> {
        self.head.map(|slot| &self.slots[slot].value)
    }

    /// The least-recently-used value, if any.
    pub fn peek_tail(&self) -> Option<&T> {
        self.tail.map(|slot| &self.slots[slot].value)
    }

    /// Iterate values head-to-tail (most- to least-recently-used) without
    /// promoting anything.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        std::iter::successors(self.head, move |&slot| self.slots[slot].next)
            .map(move |slot| &self.slots[slot].value)
    }
}
