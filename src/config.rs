//! Engine-wide tunable defaults.
//!
//! Mirrors the shape of the teacher application's `Settings`: a
//! `serde`-derived struct with a `Default` impl carrying the spec's own
//! defaults, loadable through the `config` crate so a caller embedding this
//! library can override any of them with an environment variable (prefix
//! `GRIDFORGE_`) without touching code. A config *file* layer is
//! deliberately not wired up here — a library has no natural file to point
//! at — see `DESIGN.md`.
//!
//! Loading alone isn't enough to make an override observable: every
//! component's default (no-capacity-given) constructor reads
//! [`EngineConfig::global`] rather than a hardcoded constant, the same
//! `once_cell`-backed lazy-singleton pattern `registry.rs` uses for the
//! pool registry. The first component constructed in a process determines
//! when the environment is snapshotted; set `GRIDFORGE_*` variables (or call
//! [`EngineConfig::install`]) before constructing anything if you need a
//! specific override to take effect.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Default initial capacity for a new [`crate::pool::ObjectPool`].
pub const DEFAULT_POOL_INITIAL_CAPACITY: usize = 16;
/// Minimum capacity an [`crate::pool::ObjectPool`] is ever clamped down to.
pub const DEFAULT_POOL_MINIMUM_CAPACITY: usize = 4;
/// Default capacity for a new [`crate::lru::LruCache`].
pub const DEFAULT_LRU_CAPACITY: usize = 5;
/// Minimum capacity an [`crate::heap::IndexedMinHeap`] is ever clamped up to.
pub const DEFAULT_HEAP_MINIMUM_CAPACITY: usize = 10;

/// Tunable defaults for the components in this crate.
///
/// Every field has a spec-mandated default; loading is only useful for
/// callers that want to override those defaults process-wide (e.g. a game
/// that always wants larger pools) without threading a config value through
/// every constructor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// See [`DEFAULT_POOL_INITIAL_CAPACITY`].
    pub pool_initial_capacity: usize,
    /// See [`DEFAULT_POOL_MINIMUM_CAPACITY`].
    pub pool_minimum_capacity: usize,
    /// See [`DEFAULT_LRU_CAPACITY`].
    pub lru_default_capacity: usize,
    /// See [`DEFAULT_HEAP_MINIMUM_CAPACITY`].
    pub heap_minimum_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_initial_capacity: DEFAULT_POOL_INITIAL_CAPACITY,
            pool_minimum_capacity: DEFAULT_POOL_MINIMUM_CAPACITY,
            lru_default_capacity: DEFAULT_LRU_CAPACITY,
            heap_minimum_capacity: DEFAULT_HEAP_MINIMUM_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Load defaults layered with any `GRIDFORGE_*` environment variable
    /// overrides (e.g. `GRIDFORGE_POOL_INITIAL_CAPACITY=32`).
    ///
    /// Uses the same `config::Config` builder the teacher's own
    /// `Settings::new` uses for its env-variable layer.
    pub fn load() -> crate::error::Result<Self> {
        let defaults = Self::default();
        let built = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::Environment::with_prefix("GRIDFORGE"))
            .build()?;
        Ok(built.try_deserialize()?)
    }

    /// The process-wide configuration every component's default
    /// constructor consults. Lazily [`EngineConfig::load`]s (falling back
    /// to [`EngineConfig::default`] on a load error) the first time any
    /// component asks, then caches the result for the rest of the
    /// process's life.
    pub fn global() -> Self {
        *GLOBAL.get_or_init(|| Self::load().unwrap_or_default())
    }

    /// Install `config` as the process-wide configuration returned by
    /// every later call to [`EngineConfig::global`].
    ///
    /// Returns `false` without changing anything if [`EngineConfig::global`]
    /// was already called, or [`EngineConfig::install`] already succeeded
    /// once — an embedding application should call this, if at all, before
    /// constructing any other component.
    pub fn install(config: Self) -> bool {
        GLOBAL.set(config).is_ok()
    }
}

static GLOBAL: OnceCell<EngineConfig> = OnceCell::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.pool_initial_capacity, 16);
        assert_eq!(cfg.pool_minimum_capacity, 4);
        assert_eq!(cfg.lru_default_capacity, 5);
        assert_eq!(cfg.heap_minimum_capacity, 10);
    }

    #[test]
    #[serial_test::serial(gridforge_env)]
    fn env_override_wins() {
        std::env::set_var("GRIDFORGE_POOL_INITIAL_CAPACITY", "32");
        let cfg = EngineConfig::load().expect("config should load");
        assert_eq!(cfg.pool_initial_capacity, 32);
        std::env::remove_var("GRIDFORGE_POOL_INITIAL_CAPACITY");
    }

    #[test]
    #[serial_test::serial(gridforge_env)]
    fn load_without_overrides_matches_default() {
        let cfg = EngineConfig::load().expect("config should load");
        assert_eq!(cfg, EngineConfig::default());
    }
}
