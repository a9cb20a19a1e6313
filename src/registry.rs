//! A process-wide, type-keyed registry of [`ObjectPool`]s.
//!
//! Grounded on the teacher's `daq-core::driver::DeviceRegistry`: a lazily
//! initialized global behind `once_cell::sync::OnceCell`, guarded by a
//! `parking_lot::Mutex`, keyed on `TypeId` so callers never have to name a
//! registry instance to reach "the" pool for a given type.
//!
//! `get`/`get_or_create*` are idempotent: the first call for a given `T`
//! creates and registers a pool, every later call returns that same pool.
//! Because the map key is `TypeId::of::<T>()`, a slot found under that key
//! can only ever hold an `ObjectPool<T>` — the downcast in `get` cannot
//! fail for a real type, so there is no "wrong type registered" error to
//! report. `register`/`unregister` remain as explicit helpers for callers
//! that want to install a pool ahead of time (e.g. with a non-default
//! initial capacity) or tear one down without disposing it.
//!
//! Trait objects can't be downcast to a concrete `ObjectPool<T>` directly
//! through `Box<dyn Any>` and still expose type-erased `clear`/`dispose`,
//! so entries are stored behind a small private [`ErasedPool`] trait that
//! both exposes those operations and hands back `&mut dyn Any` for the
//! downcast `get` performs.

use crate::error::Result;
use crate::pool::{FactoryCreator, ObjectPool, PoolCreator};
use once_cell::sync::OnceCell;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::any::{Any, TypeId};
use std::collections::HashMap;

trait ErasedPool: Send {
    fn clear(&mut self, shrink: bool);
    fn dispose(&mut self) -> Result<()>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> ErasedPool for ObjectPool<T>
where
    T: Send + 'static,
{
    fn clear(&mut self, shrink: bool) {
        ObjectPool::clear(self, shrink)
    }

    fn dispose(&mut self) -> Result<()> {
        ObjectPool::dispose(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Pools = HashMap<TypeId, Box<dyn ErasedPool>>;

static POOLS: OnceCell<Mutex<Pools>> = OnceCell::new();

fn pools() -> &'static Mutex<Pools> {
    POOLS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// The process-wide pool registry. All methods are associated functions —
/// there is no instance to construct, matching the teacher's singleton
/// shape.
pub struct PoolRegistry;

impl PoolRegistry {
    /// Register `pool` under its own type, replacing any pool already
    /// registered for `T`.
    pub fn register<T>(pool: ObjectPool<T>)
    where
        T: Send + 'static,
    {
        pools().lock().insert(TypeId::of::<T>(), Box::new(pool));
    }

    /// `true` if a pool is registered for `T`.
    pub fn has<T: 'static>() -> bool {
        pools().lock().contains_key(&TypeId::of::<T>())
    }

    /// Number of distinct types currently registered.
    pub fn num_pools() -> usize {
        pools().lock().len()
    }

    /// Locked, downcast access to the pool for `T`, creating one with
    /// `T::default()` as its fallback creator and
    /// [`crate::config::EngineConfig::global`]'s configured initial
    /// capacity if none is registered yet.
    pub fn get<T>() -> MappedMutexGuard<'static, ObjectPool<T>>
    where
        T: Default + Send + 'static,
    {
        Self::get_or_create::<T>(crate::config::EngineConfig::global().pool_initial_capacity)
    }

    /// Like [`PoolRegistry::get`], with an explicit capacity for the case
    /// where no pool is registered yet. Has no effect on `capacity` if a
    /// pool for `T` already exists.
    pub fn get_or_create<T>(capacity: usize) -> MappedMutexGuard<'static, ObjectPool<T>>
    where
        T: Default + Send + 'static,
    {
        Self::get_or_create_with_factory(capacity, T::default, false)
    }

    /// Like [`PoolRegistry::get_or_create`], using `factory` instead of
    /// `T::default()` as the fallback creator for a newly created pool,
    /// and prewarming it immediately if `prewarm`.
    pub fn get_or_create_with_factory<T, F>(
        capacity: usize,
        factory: F,
        prewarm: bool,
    ) -> MappedMutexGuard<'static, ObjectPool<T>>
    where
        T: Send + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        Self::get_or_create_with_creator(capacity, FactoryCreator(factory), prewarm)
    }

    /// Like [`PoolRegistry::get_or_create`], using `creator` instead of
    /// `T::default()` to drive a newly created pool's full lifecycle, and
    /// prewarming it immediately if `prewarm`.
    pub fn get_or_create_with_creator<T, C>(
        capacity: usize,
        creator: C,
        prewarm: bool,
    ) -> MappedMutexGuard<'static, ObjectPool<T>>
    where
        T: Send + 'static,
        C: PoolCreator<T> + Send + 'static,
    {
        let guard = pools().lock();
        MutexGuard::map(guard, |map| {
            let erased = map.entry(TypeId::of::<T>()).or_insert_with(|| {
                let mut pool = ObjectPool::new_inner(capacity, Box::new(creator));
                if prewarm {
                    pool.prewarm();
                }
                Box::new(pool)
            });
            erased
                .as_any_mut()
                .downcast_mut::<ObjectPool<T>>()
                .expect("a TypeId-keyed slot for T only ever holds ObjectPool<T>")
        })
    }

    /// Remove the pool registered for `T`, if any, without disposing it.
    pub fn unregister<T: 'static>() -> bool {
        pools().lock().remove(&TypeId::of::<T>()).is_some()
    }

    /// Call [`ObjectPool::clear`] on every registered pool.
    pub fn clear_all(shrink: bool) {
        for pool in pools().lock().values_mut() {
            pool.clear(shrink);
        }
    }

    /// Call [`ObjectPool::dispose`] on every registered pool, then drop
    /// them all from the registry. Stops at the first disposal error,
    /// leaving the remaining pools registered but already-disposed ones
    /// removed.
    pub fn dispose_all() -> Result<()> {
        let mut map = pools().lock();
        let keys: Vec<TypeId> = map.keys().copied().collect();
        for key in keys {
            if let Some(pool) = map.get_mut(&key) {
                pool.dispose()?;
            }
            map.remove(&key);
        }
        Ok(())
    }
}
