use std::collections::BTreeMap;

use super::class::ClassEntry;
use super::resource::ResourceSlot;
use super::spells::SpellSlots;
use crate::formula::Bindings;

/// Whether a character is played by a user or by the game master.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterKind {
    #[default]
    #[strum(to_string = "character", serialize = "pc")]
    #[cfg_attr(feature = "serde", serde(rename = "character", alias = "pc"))]
    Pc,
    #[strum(serialize = "npc")]
    #[cfg_attr(feature = "serde", serde(rename = "npc"))]
    Npc,
}

/// Ability score and its modifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityScore {
    pub value: i64,
    #[cfg_attr(feature = "serde", serde(rename = "mod"))]
    pub modifier: i64,
}

impl AbilityScore {
    /// Score with the standard `(score - 10) / 2` modifier, rounded down.
    pub const fn from_score(value: i64) -> Self {
        Self {
            value,
            modifier: (value - 10).div_euclid(2),
        }
    }
}

/// Hit point attributes.
///
/// The effective maximum is `max + tempmax`; `tempmax` is negative while the
/// character is drained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub value: i64,
    pub max: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tempmax: Option<i64>,
}

impl HitPoints {
    pub const fn new(value: i64, max: i64) -> Self {
        Self {
            value,
            max,
            tempmax: None,
        }
    }

    pub const fn effective_max(&self) -> i64 {
        match self.tempmax {
            Some(tempmax) => self.max + tempmax,
            None => self.max,
        }
    }
}

/// Death saving throw tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathSaves {
    pub success: u8,
    pub failure: u8,
}

impl DeathSaves {
    /// Failures that mark a character as dead.
    pub const MAX_FAILURES: u8 = 3;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    #[cfg_attr(feature = "serde", serde(default))]
    pub prof: i64,
    #[cfg_attr(feature = "serde", serde(default, rename = "spelldc"))]
    pub spell_dc: i64,
    pub hp: HitPoints,
    #[cfg_attr(feature = "serde", serde(default))]
    pub death: DeathSaves,
}

/// Character-scoped flags stored by the host under this module's namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterFlags {
    /// Mixed-mode opt-in.
    #[cfg_attr(feature = "serde", serde(default, rename = "enabled"))]
    pub spell_points_enabled: bool,
}

/// Pre-update snapshot of a character record as the host holds it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub kind: CharacterKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: BTreeMap<String, AbilityScore>,
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: SpellSlots,
    /// Resource slots in sheet order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: Vec<ResourceSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub classes: Vec<ClassEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: CharacterFlags,
}

impl CharacterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn is_player_character(&self) -> bool {
        self.kind == CharacterKind::Pc
    }

    pub fn opted_in(&self) -> bool {
        self.flags.spell_points_enabled
    }

    pub fn resource(&self, key: &str) -> Option<&ResourceSlot> {
        self.resources.iter().find(|resource| resource.key == key)
    }

    pub fn resource_mut(&mut self, key: &str) -> Option<&mut ResourceSlot> {
        self.resources.iter_mut().find(|resource| resource.key == key)
    }

    pub fn class(&self, id: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn class_mut(&mut self, id: &str) -> Option<&mut ClassEntry> {
        self.classes.iter_mut().find(|class| class.id == id)
    }

    /// Character level: sum of all class levels.
    pub fn total_level(&self) -> u32 {
        self.classes.iter().map(|class| class.level).sum()
    }

    /// Numeric attributes exposed to formulas.
    ///
    /// | path                                  | source                     |
    /// |---------------------------------------|----------------------------|
    /// | `abilities.<abl>.value` / `.mod`      | ability scores             |
    /// | `attributes.prof`, `attributes.spelldc` | proficiency, save DC     |
    /// | `attributes.hp.value` / `.max` / `.tempmax` | hit points           |
    /// | `details.level`                       | total character level      |
    /// | `spells.<tier>.value` / `.max`        | every slot tier            |
    /// | `spells.pact.level`                   | pact slot level            |
    /// | `resources.<key>.value` / `.max`      | resource slots             |
    /// | `classes.<id>.levels`                 | class levels               |
    pub fn bindings(&self) -> Bindings {
        let mut bindings = Bindings::new();

        for (ability, score) in &self.abilities {
            bindings.insert(format!("abilities.{ability}.value"), score.value as f64);
            bindings.insert(format!("abilities.{ability}.mod"), score.modifier as f64);
        }

        let attributes = &self.attributes;
        bindings.insert("attributes.prof", attributes.prof as f64);
        bindings.insert("attributes.spelldc", attributes.spell_dc as f64);
        bindings.insert("attributes.hp.value", attributes.hp.value as f64);
        bindings.insert("attributes.hp.max", attributes.hp.max as f64);
        bindings.insert(
            "attributes.hp.tempmax",
            attributes.hp.tempmax.unwrap_or(0) as f64,
        );
        bindings.insert("details.level", self.total_level());

        for tier in super::spells::SpellTier::ORDERED {
            let slot = self.spells.slot(tier).copied().unwrap_or_default();
            bindings.insert(format!("spells.{tier}.value"), slot.value as f64);
            bindings.insert(format!("spells.{tier}.max"), slot.capacity() as f64);
        }
        bindings.insert("spells.pact.level", self.spells.pact_level);

        for resource in &self.resources {
            bindings.insert(format!("resources.{}.value", resource.key), resource.value as f64);
            bindings.insert(format!("resources.{}.max", resource.key), resource.max as f64);
        }

        for class in &self.classes {
            bindings.insert(format!("classes.{}.levels", class.id), class.level);
        }

        bindings
    }
}
