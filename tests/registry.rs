//! Integration coverage for [`gridforge::PoolRegistry`] against a
//! domain-shaped pooled type, exercising the public API the way an
//! embedding application would rather than the registry's own internals.

use gridforge::pool::PoolCreator;
use gridforge::{ObjectPool, PoolRegistry};

#[derive(Default)]
struct Projectile {
    damage: i32,
}

struct ResetDamage;

impl PoolCreator<Projectile> for ResetDamage {
    fn on_create(&mut self) -> Projectile {
        Projectile { damage: 10 }
    }

    fn on_return(&mut self, item: &mut Projectile) {
        item.damage = 0;
    }
}

#[test]
#[serial_test::serial(registry)]
fn application_registers_and_reacquires_a_domain_pool() {
    PoolRegistry::dispose_all().ok();
    PoolRegistry::register(ObjectPool::with_creator(4, ResetDamage));

    {
        let mut pool = PoolRegistry::get::<Projectile>();
        let projectile = pool.acquire();
        assert_eq!(projectile.damage, 10);
        pool.release(projectile);
    }

    let mut pool = PoolRegistry::get::<Projectile>();
    let reused = pool.acquire();
    assert_eq!(reused.damage, 0); // on_return reset it before storage

    PoolRegistry::dispose_all().ok();
}

#[test]
#[serial_test::serial(registry)]
fn distinct_types_do_not_collide_in_the_registry() {
    PoolRegistry::dispose_all().ok();
    PoolRegistry::register(ObjectPool::<i32>::new(4));
    PoolRegistry::register(ObjectPool::with_creator(4, ResetDamage));

    assert_eq!(PoolRegistry::num_pools(), 2);
    assert_eq!(PoolRegistry::get::<i32>().size(), 4);
    assert_eq!(PoolRegistry::get::<Projectile>().size(), 4);

    PoolRegistry::dispose_all().ok();
}

#[test]
#[serial_test::serial(registry)]
fn get_without_prior_registration_auto_vivifies_a_pool() {
    PoolRegistry::dispose_all().ok();
    assert!(!PoolRegistry::has::<Projectile>());

    // No `register` call: the first `get` for this type creates and
    // registers a default-backed pool rather than erroring.
    let pool = PoolRegistry::get::<Projectile>();
    assert_eq!(
        pool.size(),
        gridforge::EngineConfig::global().pool_initial_capacity
    );
    drop(pool);
    assert!(PoolRegistry::has::<Projectile>());

    PoolRegistry::dispose_all().ok();
}

#[test]
#[serial_test::serial(registry)]
fn get_or_create_with_creator_installs_a_domain_creator_on_first_use() {
    PoolRegistry::dispose_all().ok();

    {
        let mut pool = PoolRegistry::get_or_create_with_creator(4, ResetDamage, false);
        assert_eq!(pool.acquire().damage, 10);
    }
    // Second call finds the already-registered pool; the `ResetDamage`
    // passed here is ignored because a pool for `Projectile` now exists.
    let mut pool = PoolRegistry::get_or_create_with_creator(4, ResetDamage, false);
    assert_eq!(pool.available(), 0);
    pool.release(Projectile { damage: 99 });
    assert_eq!(pool.acquire().damage, 0); // reset by the original creator

    PoolRegistry::dispose_all().ok();
}
