//! Spell point settings and formula presets.
//!
//! [`Settings`] is an immutable snapshot handed to every rule function. The host
//! stores it as a loosely typed blob, so the serde representation keeps the
//! host's field names and accepts booleans and formulas written as strings or
//! numbers.

use std::collections::BTreeMap;

/// Namespace under which the host stores every setting of this module.
pub const MODULE_NAME: &str = "dnd5e-spellpoints";

/// Full-caster maximum points for character levels 1 through 20 (DMG variant).
pub const DMG_POINTS_BY_LEVEL: [i64; 20] = [
    4, 6, 14, 17, 27, 32, 38, 44, 57, 64, 73, 73, 83, 83, 94, 94, 107, 114, 123, 133,
];

/// Point cost of slot levels 1 through 9 (DMG variant).
pub const DMG_COSTS: [&str; 9] = ["2", "3", "5", "6", "7", "9", "10", "11", "13"];

/// Point cost of slot levels 1 through 9 for the `AM_CUSTOM` preset.
pub const AM_COSTS: [&str; 9] = ["1", "2", "3", "4", "5", "12", "14", "24", "27"];

/// Base formula of the `AM_CUSTOM` preset.
pub const AM_BASE_FORMULA: &str = "ceil((1*@spells.spell1.max + 2*@spells.spell2.max + 3*@spells.spell3.max + 4*@spells.spell4.max + 5*@spells.spell5.max + 6*@spells.spell6.max + 7*@spells.spell7.max + 8*@spells.spell8.max + 9*@spells.spell9.max) / 2) + @attributes.spelldc - 8 - @attributes.prof";

/// Highest character level with an entry in the points table.
pub const MAX_CLASS_LEVEL: u8 = 20;

/// Highest spell slot level with an entry in the cost table.
pub const MAX_SLOT_LEVEL: u8 = 9;

/// Named bundles of table and formula values selectable in the settings form.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaPreset {
    #[default]
    #[strum(serialize = "DMG")]
    #[cfg_attr(feature = "serde", serde(rename = "DMG"))]
    Dmg,
    #[strum(serialize = "CUSTOM")]
    #[cfg_attr(feature = "serde", serde(rename = "CUSTOM"))]
    Custom,
    #[strum(serialize = "DMG_CUSTOM")]
    #[cfg_attr(feature = "serde", serde(rename = "DMG_CUSTOM"))]
    DmgCustom,
    #[strum(serialize = "AM_CUSTOM")]
    #[cfg_attr(feature = "serde", serde(rename = "AM_CUSTOM"))]
    AmCustom,
}

impl FormulaPreset {
    /// Label shown in the preset selector.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dmg => "Dungeon Master's Guide",
            Self::Custom => "Custom formula",
            Self::DmgCustom => "Dungeon Master's Guide (custom formula)",
            Self::AmCustom => "Arcane Mastery (custom formula)",
        }
    }

    /// The subset of settings this preset overwrites when selected.
    pub fn overrides(&self) -> PresetOverrides {
        match self {
            Self::Dmg => PresetOverrides {
                is_custom_formula: Some(false),
                points_by_class_level: Some(dmg_points_table()),
                cost_by_slot_level: Some(cost_table(&DMG_COSTS)),
                ..PresetOverrides::default()
            },
            Self::Custom => PresetOverrides {
                is_custom_formula: Some(true),
                ..PresetOverrides::default()
            },
            Self::DmgCustom => PresetOverrides {
                is_custom_formula: Some(true),
                custom_base_formula: Some("0".to_owned()),
                custom_slot_multiplier_formula: Some("1".to_owned()),
                cost_by_slot_level: Some(cost_table(&DMG_COSTS)),
                ..PresetOverrides::default()
            },
            Self::AmCustom => PresetOverrides {
                is_custom_formula: Some(true),
                custom_base_formula: Some(AM_BASE_FORMULA.to_owned()),
                custom_slot_multiplier_formula: Some("0".to_owned()),
                cost_by_slot_level: Some(cost_table(&AM_COSTS)),
                ..PresetOverrides::default()
            },
        }
    }
}

/// Fields overwritten by a [`FormulaPreset`]. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresetOverrides {
    pub is_custom_formula: Option<bool>,
    pub points_by_class_level: Option<BTreeMap<u8, i64>>,
    pub cost_by_slot_level: Option<BTreeMap<u8, String>>,
    pub custom_base_formula: Option<String>,
    pub custom_slot_multiplier_formula: Option<String>,
}

/// Active spell point configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Master switch for the whole module.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spEnableSpellpoints", deserialize_with = "lenient::boolean")
    )]
    pub enabled: bool,

    /// Label of the character resource that holds the spell point pool.
    #[cfg_attr(feature = "serde", serde(rename = "spResource"))]
    pub resource_name: String,

    /// Recompute the pool maximum whenever a class item changes.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spAutoSpellpoints", deserialize_with = "lenient::boolean")
    )]
    pub auto_recalculate_max: bool,

    /// Preset last selected in the settings form.
    #[cfg_attr(feature = "serde", serde(rename = "spFormula"))]
    pub preset: FormulaPreset,

    /// Full-caster maximum points per character level (1..=20).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spellPointsByLevel", deserialize_with = "lenient::points_table")
    )]
    pub points_by_class_level: BTreeMap<u8, i64>,

    /// Point cost formula per slot level (1..=9).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spellPointsCosts", deserialize_with = "lenient::formula_table")
    )]
    pub cost_by_slot_level: BTreeMap<u8, String>,

    /// Allow casting with hit points once the pool is exhausted.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spEnableVariant", deserialize_with = "lenient::boolean")
    )]
    pub variant_hp_payment: bool,

    /// Maximum hit points lost per missing point.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spLifeCost", deserialize_with = "lenient::formula")
    )]
    pub hp_cost_per_point: String,

    /// Characters must opt in individually.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "spMixedMode", deserialize_with = "lenient::boolean")
    )]
    pub mixed_mode_per_actor: bool,

    /// Compute the maximum from formulas instead of the points table.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "isCustom", deserialize_with = "lenient::boolean")
    )]
    pub is_custom_formula: bool,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "spCustomFormulaBase", deserialize_with = "lenient::formula")
    )]
    pub custom_base_formula: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "spCustomFormulaSlotMultiplier",
            deserialize_with = "lenient::formula"
        )
    )]
    pub custom_slot_multiplier_formula: String,
}

impl Settings {
    pub const DEFAULT_RESOURCE_NAME: &'static str = "Spell Points";
    pub const DEFAULT_HP_COST_PER_POINT: &'static str = "2";
    pub const DEFAULT_BASE_FORMULA: &'static str = "0";
    pub const DEFAULT_SLOT_MULTIPLIER_FORMULA: &'static str = "1";

    /// Hard-coded defaults (DMG tables, every toggle off).
    pub fn new() -> Self {
        Self {
            enabled: false,
            resource_name: Self::DEFAULT_RESOURCE_NAME.to_owned(),
            auto_recalculate_max: false,
            preset: FormulaPreset::Dmg,
            points_by_class_level: dmg_points_table(),
            cost_by_slot_level: cost_table(&DMG_COSTS),
            variant_hp_payment: false,
            hp_cost_per_point: Self::DEFAULT_HP_COST_PER_POINT.to_owned(),
            mixed_mode_per_actor: false,
            is_custom_formula: false,
            custom_base_formula: Self::DEFAULT_BASE_FORMULA.to_owned(),
            custom_slot_multiplier_formula: Self::DEFAULT_SLOT_MULTIPLIER_FORMULA.to_owned(),
        }
    }

    /// Defaults with a preset applied on top.
    pub fn with_preset(preset: FormulaPreset) -> Self {
        let mut settings = Self::new();
        settings.apply_preset(preset);
        settings
    }

    /// Overwrites the fields defined by `preset` and records it as selected.
    pub fn apply_preset(&mut self, preset: FormulaPreset) {
        let overrides = preset.overrides();
        self.preset = preset;

        if let Some(is_custom) = overrides.is_custom_formula {
            self.is_custom_formula = is_custom;
        }
        if let Some(points) = overrides.points_by_class_level {
            self.points_by_class_level = points;
        }
        if let Some(costs) = overrides.cost_by_slot_level {
            self.cost_by_slot_level = costs;
        }
        if let Some(base) = overrides.custom_base_formula {
            self.custom_base_formula = base;
        }
        if let Some(multiplier) = overrides.custom_slot_multiplier_formula {
            self.custom_slot_multiplier_formula = multiplier;
        }
    }

    /// Restores the table and formula invariants after a partial load.
    ///
    /// Cost levels 1..=9 and points levels 1..=20 are always populated, blank
    /// formulas fall back to their defaults.
    pub fn normalize(&mut self) {
        let defaults = Self::new();

        for (level, formula) in defaults.cost_by_slot_level {
            let entry = self.cost_by_slot_level.entry(level).or_default();
            if entry.trim().is_empty() {
                *entry = formula;
            }
        }
        for (level, points) in defaults.points_by_class_level {
            self.points_by_class_level.entry(level).or_insert(points);
        }

        fill_blank(&mut self.resource_name, Self::DEFAULT_RESOURCE_NAME);
        fill_blank(&mut self.hp_cost_per_point, Self::DEFAULT_HP_COST_PER_POINT);
        fill_blank(&mut self.custom_base_formula, Self::DEFAULT_BASE_FORMULA);
        fill_blank(
            &mut self.custom_slot_multiplier_formula,
            Self::DEFAULT_SLOT_MULTIPLIER_FORMULA,
        );
    }

    /// Cost formula configured for a slot level.
    pub fn cost_formula(&self, slot_level: u8) -> Option<&str> {
        self.cost_by_slot_level.get(&slot_level).map(String::as_str)
    }

    /// Full-caster maximum points for a caster level.
    pub fn points_for_level(&self, caster_level: u32) -> Option<i64> {
        u8::try_from(caster_level)
            .ok()
            .and_then(|level| self.points_by_class_level.get(&level))
            .copied()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_blank(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_owned();
    }
}

fn dmg_points_table() -> BTreeMap<u8, i64> {
    (1..=MAX_CLASS_LEVEL).zip(DMG_POINTS_BY_LEVEL).collect()
}

fn cost_table(costs: &[&str; 9]) -> BTreeMap<u8, String> {
    (1..=MAX_SLOT_LEVEL)
        .zip(costs.iter().map(|cost| (*cost).to_owned()))
        .collect()
}

/// Deserializers for the loosely typed values found in host settings blobs.
#[cfg(feature = "serde")]
mod lenient {
    use std::collections::BTreeMap;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Text(String),
    }

    impl Scalar {
        fn into_formula(self) -> String {
            match self {
                Scalar::Int(value) => value.to_string(),
                Scalar::Float(value) => value.to_string(),
                Scalar::Text(text) => text,
            }
        }

        fn into_points<E: Error>(self) -> Result<i64, E> {
            match self {
                Scalar::Int(value) => Ok(value),
                Scalar::Float(value) if value.fract() == 0.0 => Ok(value as i64),
                Scalar::Float(value) => Err(E::custom(format!("{value} is not a whole number"))),
                Scalar::Text(text) => text
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("`{text}` is not a whole number"))),
            }
        }
    }

    pub(super) fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => Ok(value),
            Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "on" => Ok(true),
                "false" | "0" | "off" | "" => Ok(false),
                other => Err(D::Error::custom(format!("`{other}` is not a boolean"))),
            },
        }
    }

    pub(super) fn formula<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Scalar::deserialize(deserializer)?.into_formula())
    }

    pub(super) fn formula_table<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u8, String>, D::Error> {
        let raw = BTreeMap::<u8, Scalar>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(level, value)| (level, value.into_formula()))
            .collect())
    }

    pub(super) fn points_table<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u8, i64>, D::Error> {
        BTreeMap::<u8, Scalar>::deserialize(deserializer)?
            .into_iter()
            .map(|(level, value)| value.into_points().map(|points| (level, points)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_populate_every_table_level() {
        let settings = Settings::new();

        assert_eq!(settings.points_by_class_level.len(), 20);
        assert_eq!(settings.points_for_level(1), Some(4));
        assert_eq!(settings.points_for_level(20), Some(133));
        assert_eq!(settings.points_for_level(21), None);
        assert_eq!(settings.cost_formula(3), Some("5"));
        assert_eq!(settings.cost_formula(9), Some("13"));
    }

    #[test]
    fn am_custom_preset_overrides_formulas_only() {
        let mut settings = Settings::new();
        settings.resource_name = "Mana".to_owned();
        settings.apply_preset(FormulaPreset::AmCustom);

        assert!(settings.is_custom_formula);
        assert_eq!(settings.custom_slot_multiplier_formula, "0");
        assert_eq!(settings.cost_formula(6), Some("12"));
        assert_eq!(settings.resource_name, "Mana");
        assert_eq!(settings.preset, FormulaPreset::AmCustom);
    }

    #[test]
    fn custom_preset_keeps_existing_tables() {
        let mut settings = Settings::with_preset(FormulaPreset::AmCustom);
        settings.apply_preset(FormulaPreset::Custom);

        assert!(settings.is_custom_formula);
        assert_eq!(settings.cost_formula(6), Some("12"));
    }

    #[test]
    fn normalize_fills_missing_levels_and_blank_formulas() {
        let mut settings = Settings::new();
        settings.cost_by_slot_level.remove(&4);
        settings.cost_by_slot_level.insert(5, "  ".to_owned());
        settings.custom_base_formula.clear();
        settings.custom_slot_multiplier_formula.clear();

        settings.normalize();

        assert_eq!(settings.cost_formula(4), Some("6"));
        assert_eq!(settings.cost_formula(5), Some("7"));
        assert_eq!(settings.custom_base_formula, "0");
        assert_eq!(settings.custom_slot_multiplier_formula, "1");
    }

    #[test]
    fn preset_names_round_trip_through_strum() {
        use std::str::FromStr;

        assert_eq!(FormulaPreset::from_str("DMG_CUSTOM"), Ok(FormulaPreset::DmgCustom));
        assert_eq!(FormulaPreset::AmCustom.as_ref(), "AM_CUSTOM");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_loosely_typed_host_blob() {
        let blob = serde_json::json!({
            "spEnableSpellpoints": true,
            "spResource": "Mana",
            "isCustom": "true",
            "spLifeCost": 3,
            "spellPointsCosts": { "1": 1, "3": "@attributes.prof" },
            "spellPointsByLevel": { "1": "5" }
        });

        let settings: Settings = serde_json::from_value(blob).unwrap();

        assert!(settings.enabled);
        assert!(settings.is_custom_formula);
        assert_eq!(settings.resource_name, "Mana");
        assert_eq!(settings.hp_cost_per_point, "3");
        assert_eq!(settings.cost_formula(1), Some("1"));
        assert_eq!(settings.cost_formula(3), Some("@attributes.prof"));
        assert_eq!(settings.points_for_level(1), Some(5));
        assert!(!settings.variant_hp_payment);
    }
}
