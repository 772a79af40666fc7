//! Shows what each overflow behavior does once a pool hits its ceiling.
//!
//! Run with: cargo run --example overflow_policies

use poolkit::prelude::*;

#[derive(Default)]
struct Enemy(Transform);

impl Poolable for Enemy {
    fn transform(&self) -> Transform {
        self.0
    }

    fn set_transform(&mut self, transform: Transform) {
        self.0 = transform;
    }
}

struct Spawner;

impl Host for Spawner {
    type Template = ();
    type Instance = Enemy;

    fn instantiate(&mut self, _template: &()) -> Option<Enemy> {
        Some(Enemy::default())
    }
}

fn main() {
    println!("=== Overflow Behaviors ===\n");

    for (n, &behavior) in OverflowBehavior::ALL.iter().enumerate() {
        println!("{}. {behavior}", n + 1);
        let mut pools = PoolCoordinator::with_config(Spawner, CoordinatorConfig::seeded(42));
        pools.register_pool(
            PoolConfigBuilder::new("enemies")
                .template(())
                .initial_size(3)
                .max_size(3)
                .overflow_behavior(behavior)
                .build(),
        );

        let first: Vec<_> = (0..3)
            .filter_map(|_| pools.get("enemies", None).ok().flatten())
            .collect();
        println!("   rented: {}", join(&first));

        match pools.get("enemies", None) {
            Ok(Some(id)) => println!("   4th request reused {id}"),
            Ok(None) => println!("   4th request refused"),
            Err(err) => println!("   4th request failed: {err}"),
        }
        if let Ok(active) = pools.active_instances("enemies") {
            println!("   active, oldest first: {}", join(&active));
        }
        if let Ok(stats) = pools.stats("enemies") {
            println!("   {stats}");
        }
        println!();
    }

    println!("Modes parse leniently from config text:");
    for text in ["reuse_random", "Reuse Oldest", "bogus"] {
        println!("   {text:?} -> {}", OverflowBehavior::from_name_lenient(text));
    }
}

fn join(ids: &[InstanceId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
