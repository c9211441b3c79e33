use std::collections::BTreeMap;

/// Spell slot tiers in host key order: `spell1` .. `spell9`, then `pact`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpellTier {
    Spell1,
    Spell2,
    Spell3,
    Spell4,
    Spell5,
    Spell6,
    Spell7,
    Spell8,
    Spell9,
    Pact,
}

impl SpellTier {
    /// All tiers in detection order.
    pub const ORDERED: [SpellTier; 10] = [
        Self::Spell1,
        Self::Spell2,
        Self::Spell3,
        Self::Spell4,
        Self::Spell5,
        Self::Spell6,
        Self::Spell7,
        Self::Spell8,
        Self::Spell9,
        Self::Pact,
    ];

    /// Tier holding standard slots of `level` (1..=9).
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1..=9 => Some(Self::ORDERED[usize::from(level) - 1]),
            _ => None,
        }
    }

    /// Slot level of a standard tier; `None` for pact slots, whose level lives
    /// on the character.
    pub const fn fixed_level(&self) -> Option<u8> {
        match self {
            Self::Spell1 => Some(1),
            Self::Spell2 => Some(2),
            Self::Spell3 => Some(3),
            Self::Spell4 => Some(4),
            Self::Spell5 => Some(5),
            Self::Spell6 => Some(6),
            Self::Spell7 => Some(7),
            Self::Spell8 => Some(8),
            Self::Spell9 => Some(9),
            Self::Pact => None,
        }
    }

    pub const fn is_pact(&self) -> bool {
        matches!(self, Self::Pact)
    }
}

/// Current and maximum slot count of one tier.
///
/// `max` is `None` when the host never set it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSlot {
    pub value: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max: Option<i64>,
}

impl SpellSlot {
    pub const fn new(value: i64, max: i64) -> Self {
        Self {
            value,
            max: Some(max),
        }
    }

    /// Slot maximum, treating an unset maximum as zero capacity.
    pub fn capacity(&self) -> i64 {
        self.max.unwrap_or(0)
    }
}

/// All slot tiers of a character plus the level of its pact slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSlots {
    #[cfg_attr(feature = "serde", serde(default))]
    pub slots: BTreeMap<SpellTier, SpellSlot>,
    /// Slot level of pact magic slots; `0` when the character has none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pact_level: u8,
}

impl SpellSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a tier (builder pattern).
    #[must_use]
    pub fn with_slot(mut self, tier: SpellTier, slot: SpellSlot) -> Self {
        self.slots.insert(tier, slot);
        self
    }

    /// Sets the pact slot level (builder pattern).
    #[must_use]
    pub fn with_pact_level(mut self, level: u8) -> Self {
        self.pact_level = level;
        self
    }

    pub fn slot(&self, tier: SpellTier) -> Option<&SpellSlot> {
        self.slots.get(&tier)
    }

    pub fn slot_mut(&mut self, tier: SpellTier) -> &mut SpellSlot {
        self.slots.entry(tier).or_default()
    }

    /// Slot level a cast from `tier` counts as.
    pub fn effective_level(&self, tier: SpellTier) -> Option<u8> {
        match tier.fixed_level() {
            Some(level) => Some(level),
            None if self.pact_level > 0 => Some(self.pact_level),
            None => None,
        }
    }

    /// Sum of slot maxima across every tier.
    pub fn total_capacity(&self) -> i64 {
        self.slots.values().map(SpellSlot::capacity).sum()
    }

    /// Tiers with at least one slot of capacity, in tier order.
    pub fn owned_tiers(&self) -> impl Iterator<Item = (SpellTier, &SpellSlot)> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.capacity() > 0)
            .map(|(tier, slot)| (*tier, slot))
    }
}
