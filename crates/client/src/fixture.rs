//! RON character fixtures.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use spellpoints_core::{CharacterRecord, ItemRecord};

pub fn load_character(path: &Path) -> Result<CharacterRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read character file: {}", path.display()))?;
    ron::from_str(&content)
        .with_context(|| format!("Failed to parse character file: {}", path.display()))
}

/// Overwrites the fixture with the committed character.
pub fn save_character(path: &Path, character: &CharacterRecord) -> Result<()> {
    let content = ron::ser::to_string_pretty(character, ron::ser::PrettyConfig::default())
        .context("Failed to serialize character")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write character file: {}", path.display()))
}

/// Class item for one of the character's classes, as the host would hand it over.
pub fn class_item(character: &CharacterRecord, class_id: &str) -> Result<ItemRecord> {
    let class = character
        .class(class_id)
        .with_context(|| format!("{} has no class `{class_id}`", character.name))?;
    Ok(ItemRecord::class(
        class.id.clone(),
        class.name.clone(),
        class.level,
        class.progression,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellpoints_core::{Progression, SpellTier};

    const WIZARD: &str = include_str!("../fixtures/wizard.ron");

    #[test]
    fn bundled_wizard_parses() {
        let character: CharacterRecord = ron::from_str(WIZARD).unwrap();

        assert_eq!(character.name, "Elora");
        assert!(character.is_player_character());
        assert_eq!(character.spells.slot(SpellTier::Spell3).unwrap().capacity(), 2);
        assert_eq!(character.resource("primary").unwrap().label, "Spell Points");
        assert_eq!(character.classes[0].progression, Progression::Full);
    }

    #[test]
    fn saved_character_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wizard.ron");
        let character: CharacterRecord = ron::from_str(WIZARD).unwrap();

        save_character(&path, &character).unwrap();

        assert_eq!(load_character(&path).unwrap(), character);
    }

    #[test]
    fn class_item_mirrors_class_entry() {
        let character: CharacterRecord = ron::from_str(WIZARD).unwrap();

        let item = class_item(&character, "class-wizard").unwrap();

        assert!(item.is_class());
        assert_eq!(item.level, 5);
        assert!(class_item(&character, "class-bard").is_err());
    }
}
