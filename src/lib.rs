//! Grid-based A* pathfinding, built on a reusable indexed min-heap, a
//! generic object pool with a process-wide registry, and an LRU cache
//! backing a chain-of-responsibility dispatcher.
//!
//! - [`heap`] — [`heap::IndexedMinHeap`], a decrease-key-capable binary heap.
//! - [`grid`] — [`grid::Grid`], a dense walkability bitmap.
//! - [`pathfinder`] — [`pathfinder::Pathfinder`], A* over a [`grid::Grid`].
//! - [`pool`] — [`pool::ObjectPool`], a growable stack of reusable instances.
//! - [`registry`] — [`registry::PoolRegistry`], a process-wide pool-by-type registry.
//! - [`lru`] — [`lru::LruCache`], a bounded recency cache with a predicate scan.
//! - [`dispatcher`] — [`dispatcher::ChainDispatcher`], chain-of-responsibility dispatch.
//! - [`config`] — [`config::EngineConfig`], layered defaults/env configuration.
//! - [`error`] — the crate's error type.
//! - [`telemetry`] — `tracing` subscriber bootstrap for binaries.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod grid;
pub mod heap;
pub mod lru;
pub mod pathfinder;
pub mod pool;
pub mod registry;
pub mod telemetry;

pub use config::EngineConfig;
pub use dispatcher::{ChainDispatcher, DispatchMode, Handler};
pub use error::{GridForgeError, Result};
pub use grid::Grid;
pub use heap::{HeapPayload, IndexedMinHeap};
pub use lru::LruCache;
pub use pathfinder::{PathOutcome, Pathfinder};
pub use pool::{ObjectPool, PoolCreator};
pub use registry::PoolRegistry;
