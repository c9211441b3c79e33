//! Print point costs and the pool maximum for a character.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spellpoints_core::{
    ItemRecord, MAX_SLOT_LEVEL, RuleContext, compute_maximum, cost_to_cast, locate,
};
use spellpoints_runtime::SpellPointsRuntime;

use crate::fixture::load_character;

/// Show cost per slot level, the computed maximum and the cast dialog
#[derive(Parser)]
pub struct Cost {
    /// Character fixture (RON)
    #[arg(short, long, value_name = "FILE")]
    character: PathBuf,

    /// Also render the cast dialog for a spell of this base level
    #[arg(long, value_name = "LEVEL")]
    spell_level: Option<u8>,
}

impl Cost {
    pub fn execute(self, runtime: &SpellPointsRuntime) -> Result<()> {
        let character = load_character(&self.character)?;
        let settings = runtime.settings()?;
        let ctx = RuleContext::new(&settings, runtime.evaluator());
        let bindings = character.bindings();

        println!("costs ({}):", settings.resource_name);
        for level in 1..=MAX_SLOT_LEVEL {
            match cost_to_cast(level, &bindings, &ctx) {
                Ok(cost) => println!("  level {level}: {cost}"),
                Err(error) => println!("  level {level}: {error}"),
            }
        }

        match compute_maximum(&character, None, &ctx) {
            Ok(max) => println!("computed maximum: {max}"),
            Err(error) => println!("computed maximum: {error}"),
        }
        match locate(&character, &settings) {
            Ok(pool) => println!("pool [{}]: {}/{}", pool.key, pool.value, pool.max),
            Err(error) => println!("pool: {error}"),
        }

        if let Some(level) = self.spell_level {
            let spell = ItemRecord::spell("spell-preview", "Spell", u32::from(level));
            match runtime.render_ability_use_dialog(&character, &spell) {
                Some(view) => {
                    println!("dialog:");
                    for (option, label) in &view.options {
                        let pact = if option.pact { " (pact)" } else { "" };
                        println!("  level {}{pact}: {label}", option.level);
                    }
                    for warning in &view.warnings {
                        println!("  warning: {warning}");
                    }
                }
                None => println!("dialog: not decorated"),
            }
        }
        Ok(())
    }
}
