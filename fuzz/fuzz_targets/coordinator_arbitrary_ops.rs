#![no_main]

use libfuzzer_sys::fuzz_target;
use poolkit::prelude::*;

#[derive(Default)]
struct Shell(Transform);

impl Poolable for Shell {
    fn transform(&self) -> Transform {
        self.0
    }

    fn set_transform(&mut self, transform: Transform) {
        self.0 = transform;
    }
}

#[derive(Default)]
struct Forge {
    live: usize,
}

impl Host for Forge {
    type Template = u8;
    type Instance = Shell;

    fn instantiate(&mut self, _template: &u8) -> Option<Shell> {
        self.live += 1;
        Some(Shell::default())
    }

    fn destroy(&mut self, _instance: Shell) {
        self.live -= 1;
    }
}

const KEYS: [&str; 3] = ["block", "oldest", "random"];

// Fuzz arbitrary get/release/clear traffic across three pools
//
// One pool per overflow behavior. After every step the coordinator's
// cross-checks must hold and the host must agree on the live count.
fuzz_target!(|data: &[u8]| {
    let mut pools = PoolCoordinator::with_config(Forge::default(), CoordinatorConfig::seeded(7));
    for (key, &behavior) in KEYS.into_iter().zip(OverflowBehavior::ALL) {
        pools.register_pool(
            PoolConfigBuilder::new(key)
                .template(0)
                .template(1)
                .initial_size(2)
                .max_size(5)
                .overflow_behavior(behavior)
                .build(),
        );
    }
    let mut handles: Vec<InstanceId> = Vec::new();

    for pair in data.chunks_exact(2) {
        let key = KEYS[usize::from(pair[1]) % KEYS.len()];

        match pair[0] % 6 {
            0 | 1 => {
                if let Some(id) = pools.get(key, None).unwrap() {
                    assert!(pools.is_active(id));
                    handles.push(id);
                }
            }
            2 => {
                if !handles.is_empty() {
                    let id = handles.swap_remove(usize::from(pair[1]) % handles.len());
                    // Overflow reuse can hand the same handle out twice.
                    let _ = pools.release(id);
                    assert!(!pools.is_active(id));
                }
            }
            3 => {
                pools.release_count(key, usize::from(pair[1] % 3)).unwrap();
            }
            4 => {
                pools.clear_pool(key).unwrap();
                assert_eq!(pools.total_created(key), Ok(0));
            }
            5 => {
                pools.release_all().unwrap();
            }
            _ => unreachable!(),
        }

        pools.check_invariants().unwrap();
        assert_eq!(pools.instance_count(), pools.host().live);
        for key in KEYS {
            assert!(pools.total_created(key).unwrap() <= 5);
        }
    }

    pools.dispose();
    assert_eq!(pools.host().live, 0);
});
