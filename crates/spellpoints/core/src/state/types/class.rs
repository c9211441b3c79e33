/// Spellcasting advancement rate of a class.
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
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Progression {
    Full,
    Half,
    Third,
    Pact,
    Artificer,
    #[default]
    None,
}

impl Progression {
    /// Caster level used to read the points table.
    ///
    /// Full casters use their class level, half and third casters round up.
    /// Every other progression has no entry in the table.
    pub const fn effective_caster_level(&self, class_level: u32) -> Option<u32> {
        match self {
            Self::Full => Some(class_level),
            Self::Half => Some(class_level.div_ceil(2)),
            Self::Third => Some(class_level.div_ceil(3)),
            Self::Pact | Self::Artificer | Self::None => None,
        }
    }
}

/// One class a character has levels in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassEntry {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progression: Progression,
}

impl ClassEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: u32,
        progression: Progression,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            progression,
        }
    }
}
