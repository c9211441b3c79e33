//! Simulate a class item change and the pool maximum refresh.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spellpoints_core::ItemChange;
use spellpoints_runtime::SpellPointsRuntime;

use super::cast::print_state;
use crate::fixture::{class_item, load_character, save_character};

/// Recalculate the pool maximum after a class is created or levelled
#[derive(Parser)]
pub struct Recalc {
    /// Character fixture (RON)
    #[arg(short, long, value_name = "FILE")]
    character: PathBuf,

    /// Id of the class item that changed
    #[arg(long, value_name = "ID")]
    class: String,

    /// New class level; without it the class is treated as newly created
    #[arg(long, value_name = "LEVEL")]
    levels: Option<u32>,

    /// Write the committed character back to the fixture
    #[arg(long)]
    write: bool,
}

impl Recalc {
    pub fn execute(self, runtime: &SpellPointsRuntime) -> Result<()> {
        let mut character = load_character(&self.character)?;
        let item = class_item(&character, &self.class)?;

        let update = match self.levels {
            Some(levels) => runtime.item_updated(&character, &item, &ItemChange::levels(levels)),
            None => runtime.item_created(&character, &item),
        };

        // The host commits the item change itself.
        if let Some(levels) = self.levels
            && let Some(class) = character.class_mut(&self.class)
        {
            class.level = levels;
        }

        let after = match update {
            Some(update) => {
                println!("update: {}", serde_json::to_string(&update)?);
                update.apply_to(&character)
            }
            None => {
                println!("no change");
                character
            }
        };
        print_state(&after);

        if self.write {
            save_character(&self.character, &after)?;
            tracing::info!(path = %self.character.display(), "Character written");
        }
        Ok(())
    }
}
