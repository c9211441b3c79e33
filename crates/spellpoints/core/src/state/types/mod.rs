//! Character record types read by the rules.
//!
//! These mirror the parts of the host's character record that spell points
//! touch. They are snapshots: the rules never mutate them and instead return a
//! [`PendingUpdate`](crate::state::PendingUpdate) for the host to commit.

mod character;
mod class;
mod item;
mod resource;
mod spells;

pub use character::{
    AbilityScore, Attributes, CharacterFlags, CharacterKind, CharacterRecord, DeathSaves,
    HitPoints,
};
pub use class::{ClassEntry, Progression};
pub use item::{ItemChange, ItemKind, ItemRecord};
pub use resource::ResourceSlot;
pub use spells::{SpellSlot, SpellSlots, SpellTier};
