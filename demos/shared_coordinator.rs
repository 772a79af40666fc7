//! Several threads sharing one coordinator through `ConcurrentPoolCoordinator`.
//!
//! Run with: cargo run --example shared_coordinator --features concurrency

use std::sync::Arc;
use std::thread;

use poolkit::prelude::*;

#[derive(Default)]
struct Spark(Transform);

impl Poolable for Spark {
    fn transform(&self) -> Transform {
        self.0
    }

    fn set_transform(&mut self, transform: Transform) {
        self.0 = transform;
    }
}

struct Effects;

impl Host for Effects {
    type Template = u8;
    type Instance = Spark;

    fn instantiate(&mut self, _template: &u8) -> Option<Spark> {
        Some(Spark::default())
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    println!("=== Shared Coordinator ===\n");

    let pools = Arc::new(ConcurrentPoolCoordinator::new(Effects));
    pools.register_pool(
        PoolConfigBuilder::new("sparks")
            .category("Effects")
            .template(0)
            .template(1)
            .instantiation_mode(InstantiationMode::Random)
            .initial_size(8)
            .max_size(32)
            .build(),
    );

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let pools = Arc::clone(&pools);
            thread::spawn(move || {
                let mut served = 0;
                for _ in 0..1_000 {
                    let Ok(Some(id)) = pools.get("sparks", None) else {
                        continue;
                    };
                    served += 1;
                    let _ = pools.release(id);
                }
                (worker, served)
            })
        })
        .collect();

    for handle in workers {
        if let Ok((worker, served)) = handle.join() {
            println!("   worker {worker} served {served} requests");
        }
    }

    if let Ok(stats) = pools.stats("sparks") {
        println!("\n   {stats}");
    }
    pools.with(|coordinator| coordinator.log_statistics());
}
