#![no_main]

use libfuzzer_sys::fuzz_target;
use poolkit::ds::SlotArena;

// Fuzz arbitrary operation sequences on SlotArena
//
// Removed handles must stay dead even after their index is reused.
fuzz_target!(|data: &[u8]| {
    let mut arena: SlotArena<u32> = SlotArena::new();
    let mut live = Vec::new();
    let mut dead = Vec::new();

    for pair in data.chunks_exact(2) {
        let value = u32::from(pair[1]);

        match pair[0] % 5 {
            0 => {
                let id = arena.insert(value);
                assert_eq!(arena.get(id), Some(&value));
                live.push(id);
            }
            1 => {
                if !live.is_empty() {
                    let id = live.swap_remove(value as usize % live.len());
                    let len = arena.len();
                    assert!(arena.remove(id).is_some());
                    assert_eq!(arena.len(), len - 1);
                    dead.push(id);
                }
            }
            2 => {
                if !live.is_empty() {
                    let id = live[value as usize % live.len()];
                    if let Some(slot) = arena.get_mut(id) {
                        *slot = value;
                    }
                    assert_eq!(arena.get(id), Some(&value));
                }
            }
            3 => {
                for id in &dead {
                    assert!(!arena.contains(*id));
                    assert!(arena.get(*id).is_none());
                }
            }
            4 => {
                arena.clear();
                dead.append(&mut live);
                assert!(arena.is_empty());
            }
            _ => unreachable!(),
        }

        assert_eq!(arena.len(), live.len());
        assert_eq!(arena.iter().count(), live.len());
    }
});
