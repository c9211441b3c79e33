use super::class::{ClassEntry, Progression};

/// Kind of an owned item, as far as spell points care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ItemKind {
    Spell,
    Class,
    Other,
}

/// Item owned by a character.
///
/// `level` is the base spell level for spells and the class level for classes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progression: Progression,
}

impl ItemRecord {
    pub fn spell(id: impl Into<String>, name: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::Spell,
            level,
            progression: Progression::None,
        }
    }

    pub fn class(
        id: impl Into<String>,
        name: impl Into<String>,
        level: u32,
        progression: Progression,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::Class,
            level,
            progression,
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == ItemKind::Class
    }

    pub fn is_spell(&self) -> bool {
        self.kind == ItemKind::Spell
    }

    /// The class entry this item describes, if it is a class.
    pub fn as_class_entry(&self) -> Option<ClassEntry> {
        self.is_class().then(|| {
            ClassEntry::new(
                self.id.clone(),
                self.name.clone(),
                self.level,
                self.progression,
            )
        })
    }
}

/// Proposed, not yet committed, changes to an item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemChange {
    /// New class level, when the update changes it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: Option<u32>,
}

impl ItemChange {
    pub const fn levels(levels: u32) -> Self {
        Self {
            levels: Some(levels),
        }
    }
}
