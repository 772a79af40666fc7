#![no_main]

use libfuzzer_sys::fuzz_target;
use poolkit::pool::{PoolHooks, PoolRecord};

struct Ledger {
    next: u32,
    alive: Vec<u32>,
}

impl PoolHooks<u32> for Ledger {
    fn create(&mut self) -> Option<u32> {
        self.next += 1;
        self.alive.push(self.next);
        Some(self.next)
    }

    fn on_destroy(&mut self, item: u32) {
        let Some(index) = self.alive.iter().position(|&alive| alive == item) else {
            panic!("destroyed {item} twice");
        };
        self.alive.swap_remove(index);
    }
}

// Fuzz arbitrary operation sequences on a bounded PoolRecord
//
// First byte picks the slot count and ceiling; the rest are (op, arg) pairs
// covering rent, give_back, bulk returns, prewarm and clear.
fuzz_target!(|data: &[u8]| {
    let Some((&shape, ops)) = data.split_first() else {
        return;
    };
    let slots = usize::from(shape & 0x0f);
    let max_size = slots + usize::from(shape >> 4);

    let mut hooks = Ledger {
        next: 0,
        alive: Vec::new(),
    };
    let mut record = PoolRecord::new(slots, max_size);
    // Oldest first, mirroring the pool's active ordering.
    let mut rented: Vec<u32> = Vec::new();

    for pair in ops.chunks_exact(2) {
        let arg = usize::from(pair[1]);

        match pair[0] % 6 {
            0 => {
                if let Some(item) = record.rent(&mut hooks).unwrap() {
                    assert!(!rented.contains(&item));
                    rented.push(item);
                } else {
                    assert!(record.is_exhausted());
                }
            }
            1 => {
                if !rented.is_empty() {
                    let item = rented.remove(arg % rented.len());
                    record.give_back(item, &mut hooks).unwrap();
                    assert!(record.give_back(item, &mut hooks).is_err());
                }
            }
            2 => {
                let released = record.give_back_many(arg % 4, &mut hooks).unwrap();
                let oldest: Vec<u32> = rented.drain(..released).collect();
                for item in oldest {
                    assert!(!record.slot_pool().is_active(&item));
                }
            }
            3 => {
                record.give_back_all(&mut hooks).unwrap();
                rented.clear();
            }
            4 => {
                record.prewarm(arg % 8, &mut hooks).unwrap();
            }
            5 => {
                record.clear(&mut hooks).unwrap();
                rented.clear();
                assert!(hooks.alive.is_empty());
                assert_eq!(record.total_created(), 0);
            }
            _ => unreachable!(),
        }

        assert_eq!(record.active_count(), rented.len());
        assert_eq!(record.slot_pool().active_snapshot(), rented);
        assert!(record.total_created() <= max_size);
        assert_eq!(
            record.active_count() + record.inactive_count(),
            hooks.alive.len()
        );
        record.debug_validate_invariants();
    }
});
