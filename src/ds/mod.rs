pub mod active_set;
pub mod intrusive_list;
pub mod slot_arena;

pub use active_set::ActiveSet;
pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
