//! Registers a couple of pools, rents and returns instances, and prints stats.
//!
//! Run with: cargo run --example basic_pool

use glam::Vec3;
use poolkit::prelude::*;

#[derive(Debug, Default)]
struct Bullet {
    transform: Transform,
    kind: &'static str,
    visible: bool,
}

impl Poolable for Bullet {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }
}

#[derive(Default)]
struct Scene {
    spawned: usize,
}

impl Host for Scene {
    type Template = &'static str;
    type Instance = Bullet;

    fn instantiate(&mut self, template: &&'static str) -> Option<Bullet> {
        self.spawned += 1;
        Some(Bullet {
            kind: *template,
            ..Bullet::default()
        })
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    println!("=== Basic Pool ===\n");

    let mut pools = PoolCoordinator::new(Scene::default());
    pools.register_pool(
        PoolConfigBuilder::new("bullets")
            .category("Projectiles")
            .template("tracer")
            .template("slug")
            .initial_size(4)
            .max_size(8)
            .reset_mode(ResetMode::UseProvidedValues)
            .build(),
    );
    println!("1. Prewarm");
    println!("   spawned by host: {}", pools.host().spawned);
    println!("   inactive: {:?}\n", pools.inactive_count("bullets"));

    println!("2. Rent with placement");
    let muzzle = Transform::from_position(Vec3::new(0.0, 1.5, 0.0));
    let mut fired = Vec::new();
    for _ in 0..6 {
        if let Ok(Some(id)) = pools.get("bullets", Some(muzzle)) {
            fired.push(id);
        }
    }
    for id in &fired {
        if let Some(bullet) = pools.instance(*id) {
            println!(
                "   {id}: kind={} visible={} at {}",
                bullet.kind, bullet.visible, bullet.transform.position
            );
        }
    }
    println!("   host spawned {} in total\n", pools.host().spawned);

    println!("3. Return half");
    match pools.release_count("bullets", 3) {
        Ok(released) => println!("   released {released} oldest"),
        Err(err) => println!("   release failed: {err}"),
    }
    if let Ok(stats) = pools.stats("bullets") {
        println!("   {stats}\n");
    }

    println!("4. Clear");
    if let Err(err) = pools.clear_pool("bullets") {
        println!("   clear failed: {err}");
    }
    if let Some(&id) = fired.first() {
        println!("   {id} still usable? {}", pools.instance(id).is_some());
    }
    pools.log_statistics();
}
