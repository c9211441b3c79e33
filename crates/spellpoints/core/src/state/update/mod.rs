//! Typed partial updates to a character record.
//!
//! A [`PendingUpdate`] is what the host proposes before it commits a change,
//! and what the rules hand back after rewriting it. Every field is optional:
//! `None` means "leave the stored value alone". An empty update is a valid
//! answer and is how a change gets vetoed.

mod bitmask;

use std::collections::BTreeMap;

pub use bitmask::UpdateFields;

use super::types::{CharacterRecord, SpellTier};

/// Proposed change to one slot tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPatch {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max: Option<i64>,
}

impl SlotPatch {
    pub const fn value(value: i64) -> Self {
        Self {
            value: Some(value),
            max: None,
        }
    }
}

/// Proposed change to hit points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpPatch {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tempmax: Option<i64>,
}

/// Proposed change to one resource slot, addressed by its key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePatch {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max: Option<i64>,
}

/// Proposed change to death saving throws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathSavePatch {
    pub failure: u8,
}

/// Partial update of a character record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingUpdate {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub slot_change: BTreeMap<SpellTier, SlotPatch>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub hp_change: Option<HpPatch>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub resource_change: BTreeMap<String, ResourcePatch>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub death_save_change: Option<DeathSavePatch>,
    /// Mixed-mode opt-in flag.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub opt_in_change: Option<bool>,
}

impl PendingUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposes a new slot count for a tier (builder pattern).
    #[must_use]
    pub fn with_slot_value(mut self, tier: SpellTier, value: i64) -> Self {
        self.slot_change.entry(tier).or_default().value = Some(value);
        self
    }

    /// Proposes a new resource value (builder pattern).
    #[must_use]
    pub fn with_resource_value(mut self, key: impl Into<String>, value: i64) -> Self {
        self.set_resource_value(key, value);
        self
    }

    pub fn set_resource_value(&mut self, key: impl Into<String>, value: i64) {
        self.resource_change.entry(key.into()).or_default().value = Some(value);
    }

    pub fn set_resource_max(&mut self, key: impl Into<String>, max: i64) {
        self.resource_change.entry(key.into()).or_default().max = Some(max);
    }

    pub fn hp_mut(&mut self) -> &mut HpPatch {
        self.hp_change.get_or_insert_with(HpPatch::default)
    }

    pub fn slot(&self, tier: SpellTier) -> Option<&SlotPatch> {
        self.slot_change.get(&tier)
    }

    pub fn slot_mut(&mut self, tier: SpellTier) -> &mut SlotPatch {
        self.slot_change.entry(tier).or_default()
    }

    pub fn resource(&self, key: &str) -> Option<&ResourcePatch> {
        self.resource_change.get(key)
    }

    pub fn touches_slots(&self) -> bool {
        !self.slot_change.is_empty()
    }

    /// Which parts of the record this update writes.
    pub fn touched(&self) -> UpdateFields {
        let mut fields = UpdateFields::empty();

        if !self.slot_change.is_empty() {
            fields |= UpdateFields::SLOTS;
        }
        if self.hp_change.is_some() {
            fields |= UpdateFields::HP;
        }
        if !self.resource_change.is_empty() {
            fields |= UpdateFields::RESOURCES;
        }
        if self.death_save_change.is_some() {
            fields |= UpdateFields::DEATH_SAVES;
        }
        if self.opt_in_change.is_some() {
            fields |= UpdateFields::FLAGS;
        }

        fields
    }

    pub fn is_empty(&self) -> bool {
        self.touched().is_empty()
    }

    /// Merges this update into a copy of `character`, the way the host
    /// commits it.
    ///
    /// Patches addressing resource keys the character does not have are
    /// ignored.
    pub fn apply_to(&self, character: &CharacterRecord) -> CharacterRecord {
        let mut next = character.clone();

        for (tier, patch) in &self.slot_change {
            let slot = next.spells.slot_mut(*tier);
            if let Some(value) = patch.value {
                slot.value = value;
            }
            if let Some(max) = patch.max {
                slot.max = Some(max);
            }
        }

        if let Some(hp) = self.hp_change {
            if let Some(value) = hp.value {
                next.attributes.hp.value = value;
            }
            if let Some(tempmax) = hp.tempmax {
                next.attributes.hp.tempmax = Some(tempmax);
            }
        }

        for (key, patch) in &self.resource_change {
            if let Some(resource) = next.resource_mut(key) {
                if let Some(value) = patch.value {
                    resource.value = value;
                }
                if let Some(max) = patch.max {
                    resource.max = max;
                }
            }
        }

        if let Some(death) = self.death_save_change {
            next.attributes.death.failure = death.failure;
        }

        if let Some(enabled) = self.opt_in_change {
            next.flags.spell_points_enabled = enabled;
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterKind, HitPoints, ResourceSlot, SpellSlot, SpellSlots};

    fn character() -> CharacterRecord {
        let mut character = CharacterRecord::new("a1", "Elora", CharacterKind::Pc);
        character.attributes.hp = HitPoints::new(25, 30);
        character.spells = SpellSlots::new().with_slot(SpellTier::Spell3, SpellSlot::new(3, 3));
        character
            .resources
            .push(ResourceSlot::new("primary", "Spell Points", 10, 20));
        character
    }

    #[test]
    fn empty_update_touches_nothing() {
        let update = PendingUpdate::new();
        assert!(update.is_empty());
        assert_eq!(update.apply_to(&character()), character());
    }

    #[test]
    fn touched_reports_each_written_part() {
        let mut update = PendingUpdate::new()
            .with_slot_value(SpellTier::Spell3, 2)
            .with_resource_value("primary", 5);
        update.hp_mut().tempmax = Some(-4);

        assert_eq!(
            update.touched(),
            UpdateFields::SLOTS | UpdateFields::RESOURCES | UpdateFields::HP
        );
    }

    #[test]
    fn apply_merges_only_set_fields() {
        let mut update = PendingUpdate::new()
            .with_slot_value(SpellTier::Spell3, 2)
            .with_resource_value("primary", 5)
            .with_resource_value("missing", 1);
        update.hp_mut().tempmax = Some(-4);

        let next = update.apply_to(&character());

        assert_eq!(next.spells.slot(SpellTier::Spell3), Some(&SpellSlot::new(2, 3)));
        assert_eq!(next.resource("primary").map(|r| (r.value, r.max)), Some((5, 20)));
        assert_eq!(next.attributes.hp.value, 25);
        assert_eq!(next.attributes.hp.tempmax, Some(-4));
        assert_eq!(next.resources.len(), 1);
    }
}
