//! Character state and the typed updates proposed against it.
//!
//! The host owns every character record. Rules read a [`CharacterRecord`]
//! snapshot and answer with a [`PendingUpdate`]; the host merges that update
//! atomically. Nothing in this crate writes to a record directly.

pub mod types;
pub mod update;

pub use types::{
    AbilityScore, Attributes, CharacterFlags, CharacterKind, CharacterRecord, ClassEntry,
    DeathSaves, HitPoints, ItemChange, ItemKind, ItemRecord, Progression, ResourceSlot,
    SpellSlot, SpellSlots, SpellTier,
};
pub use update::{
    DeathSavePatch, HpPatch, PendingUpdate, ResourcePatch, SlotPatch, UpdateFields,
};
