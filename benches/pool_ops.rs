//! Micro-operation benchmarks for the pool layers.
//!
//! Run with: `cargo bench --bench pool_ops`
//!
//! Measures per-operation latency for rent/return on a bare `SlotPool`,
//! get/release through the coordinator, and the overflow reuse path.

use std::hint::black_box;
use std::time::Instant;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use poolkit::prelude::*;

const POOL_SIZE: usize = 1_024;
const OPS: u64 = 100_000;

#[derive(Default)]
struct Counter {
    next: u32,
}

impl PoolHooks<u32> for Counter {
    fn create(&mut self) -> Option<u32> {
        self.next += 1;
        Some(self.next)
    }
}

#[derive(Default)]
struct Particle(Transform);

impl Poolable for Particle {
    fn transform(&self) -> Transform {
        self.0
    }

    fn set_transform(&mut self, transform: Transform) {
        self.0 = transform;
    }
}

struct Emitter;

impl Host for Emitter {
    type Template = u8;
    type Instance = Particle;

    fn instantiate(&mut self, _template: &u8) -> Option<Particle> {
        Some(Particle::default())
    }
}

fn coordinator(overflow: OverflowBehavior) -> PoolCoordinator<Emitter> {
    let mut pools = PoolCoordinator::with_config(Emitter, CoordinatorConfig::seeded(1));
    pools.register_pool(
        PoolConfigBuilder::new("particles")
            .template(0)
            .template(1)
            .initial_size(POOL_SIZE)
            .max_size(POOL_SIZE)
            .overflow_behavior(overflow)
            .build(),
    );
    pools
}

// ============================================================================
// SlotPool rent/return (ns/op)
// ============================================================================

fn bench_slot_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_pool_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("rent_give_back", |b| {
        b.iter_custom(|iters| {
            let mut hooks = Counter::default();
            let mut pool = SlotPool::new(POOL_SIZE);
            pool.prewarm(POOL_SIZE, &mut hooks).unwrap();
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS {
                    let item = pool.rent(&mut hooks).unwrap().unwrap();
                    pool.give_back(black_box(item), &mut hooks).unwrap();
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("overflow_stack", |b| {
        b.iter_custom(|iters| {
            let mut hooks = Counter::default();
            let mut pool = SlotPool::new(8);
            pool.prewarm(256, &mut hooks).unwrap();
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS / 64 {
                    let items: Vec<_> = (0..64)
                        .map(|_| pool.rent(&mut hooks).unwrap().unwrap())
                        .collect();
                    for item in items {
                        pool.give_back(item, &mut hooks).unwrap();
                    }
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Coordinator get/release (ns/op)
// ============================================================================

fn bench_coordinator(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinator_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("get_release", |b| {
        b.iter_custom(|iters| {
            let mut pools = coordinator(OverflowBehavior::ReuseOldest);
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS {
                    let id = pools.get("particles", None).unwrap().unwrap();
                    pools.release(black_box(id)).unwrap();
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("get_with_placement", |b| {
        b.iter_custom(|iters| {
            let mut pools = coordinator(OverflowBehavior::ReuseOldest);
            pools
                .set_reset_mode("particles", ResetMode::UseProvidedValues)
                .unwrap();
            let spot = Transform::from_position(glam::Vec3::ONE);
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS {
                    let id = pools.get("particles", Some(spot)).unwrap().unwrap();
                    pools.release(black_box(id)).unwrap();
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Overflow reuse (ns/op)
// ============================================================================

fn bench_overflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("overflow_ns");
    group.throughput(Throughput::Elements(OPS));

    for (name, behavior) in [
        ("reuse_oldest", OverflowBehavior::ReuseOldest),
        ("reuse_random", OverflowBehavior::ReuseRandom),
        ("block", OverflowBehavior::Block),
    ] {
        group.bench_function(name, |b| {
            b.iter_custom(|iters| {
                let mut pools = coordinator(behavior);
                for _ in 0..POOL_SIZE {
                    pools.get("particles", None).unwrap();
                }
                let start = Instant::now();
                for _ in 0..iters {
                    for _ in 0..OPS {
                        black_box(pools.get("particles", None).unwrap());
                    }
                }
                start.elapsed()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_slot_pool, bench_coordinator, bench_overflow);
criterion_main!(benches);
