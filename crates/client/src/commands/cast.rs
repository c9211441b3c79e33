//! Simulate casting a spell from a slot tier.
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use spellpoints_core::{CharacterRecord, PendingUpdate, SpellTier};
use spellpoints_runtime::SpellPointsRuntime;

use crate::fixture::{load_character, save_character};

/// Consume one slot and settle it the way the host would
#[derive(Parser)]
pub struct Cast {
    /// Character fixture (RON)
    #[arg(short, long, value_name = "FILE")]
    character: PathBuf,

    /// Slot tier to consume (spell1 .. spell9, pact)
    #[arg(short, long, default_value = "spell1", value_parser = super::parse_tier)]
    tier: SpellTier,

    /// Write the committed character back to the fixture
    #[arg(long)]
    write: bool,
}

impl Cast {
    pub fn execute(self, runtime: &SpellPointsRuntime) -> Result<()> {
        let character = load_character(&self.character)?;

        let Some(slot) = character.spells.slot(self.tier) else {
            bail!("{} has no {} slots", character.name, self.tier);
        };
        if slot.value <= 0 {
            bail!("{} has no {} slots left", character.name, self.tier);
        }

        let proposed = PendingUpdate::new().with_slot_value(self.tier, slot.value - 1);
        tracing::debug!(actor = %character.id, tier = %self.tier, "Proposing slot consumption");

        let update = runtime.pre_update_character(&character, proposed);
        let after = update.apply_to(&character);

        println!("update: {}", serde_json::to_string(&update)?);
        print_state(&after);

        if self.write {
            save_character(&self.character, &after)?;
            tracing::info!(path = %self.character.display(), "Character written");
        }
        Ok(())
    }
}

pub(super) fn print_state(character: &CharacterRecord) {
    let hp = &character.attributes.hp;
    println!(
        "{}: hp {}/{} (tempmax {}), death failures {}",
        character.name,
        hp.value,
        hp.effective_max(),
        hp.tempmax.unwrap_or(0),
        character.attributes.death.failure,
    );
    for (tier, slot) in character.spells.owned_tiers() {
        println!("  {tier}: {}/{}", slot.value, slot.capacity());
    }
    for resource in &character.resources {
        println!(
            "  {} [{}]: {}/{}",
            resource.label, resource.key, resource.value, resource.max
        );
    }
}
