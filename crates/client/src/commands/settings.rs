//! Inspect and edit the stored module settings.
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Subcommand};
use serde_json::Value;
use spellpoints_core::{FormulaPreset, Settings, SettingsForm};
use spellpoints_runtime::{ENABLED_KEY, RuntimeError, SpellPointsRuntime};

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the active settings
    Show {
        /// Print the stored JSON blob instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Apply a formula preset (DMG, CUSTOM, DMG_CUSTOM, AM_CUSTOM)
    Preset {
        #[arg(value_name = "PRESET", value_parser = super::parse_preset)]
        preset: FormulaPreset,
    },

    /// Restore every setting to its default
    Reset,

    /// Turn the module on or off
    Enable {
        #[arg(action = ArgAction::Set, value_name = "BOOL")]
        enabled: bool,
    },

    /// Set one field by its stored name (e.g. spLifeCost, spellPointsCosts)
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        /// JSON value; anything that is not valid JSON is taken as a string
        #[arg(value_name = "VALUE")]
        value: String,
    },
}

impl SettingsCommand {
    pub fn execute(self, runtime: &SpellPointsRuntime) -> Result<()> {
        match self {
            Self::Show { json } => {
                let settings = runtime.settings()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                } else {
                    print_summary(&settings);
                }
            }
            Self::Preset { preset } => {
                let mut form = runtime.open_settings_form()?;
                form.select_preset(preset);
                let settings = submit(runtime, form)?;
                tracing::info!(preset = %settings.preset, "Preset applied");
                print_summary(&settings);
            }
            Self::Reset => {
                let mut form = runtime.open_settings_form()?;
                form.reset();
                let settings = submit(runtime, form)?;
                tracing::info!("Settings reset to defaults");
                print_summary(&settings);
            }
            Self::Enable { enabled } => {
                let settings = runtime.set_setting(ENABLED_KEY, Value::Bool(enabled))?;
                println!("enabled: {}", settings.enabled);
            }
            Self::Set { key, value } => {
                let mut blob = serde_json::to_value(runtime.settings()?)?;
                let Some(fields) = blob.as_object_mut() else {
                    bail!("Settings did not serialize to an object");
                };
                if !fields.contains_key(&key) {
                    bail!("Unknown setting `{key}`");
                }
                let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
                fields.insert(key.clone(), value);

                let mut form = runtime.open_settings_form()?;
                form.fields = serde_json::from_value(blob)
                    .with_context(|| format!("Invalid value for `{key}`"))?;
                let settings = submit(runtime, form)?;
                tracing::info!(key = %key, "Setting updated");
                print_summary(&settings);
            }
        }
        Ok(())
    }
}

fn submit(runtime: &SpellPointsRuntime, form: SettingsForm) -> Result<Settings> {
    match runtime.submit_settings_form(form) {
        Ok(settings) => Ok(settings),
        Err(RuntimeError::InvalidSettings(errors)) => {
            for error in &errors {
                eprintln!("  {error}");
            }
            bail!("{} invalid field(s), nothing saved", errors.len())
        }
        Err(error) => Err(error.into()),
    }
}

fn print_summary(settings: &Settings) {
    println!("enabled:            {}", settings.enabled);
    println!("resource:           {}", settings.resource_name);
    println!("preset:             {}", settings.preset);
    println!("auto recalculate:   {}", settings.auto_recalculate_max);
    println!("hit point variant:  {}", settings.variant_hp_payment);
    println!("life cost:          {}", settings.hp_cost_per_point);
    println!("mixed mode:         {}", settings.mixed_mode_per_actor);
    if settings.is_custom_formula {
        println!("custom base:        {}", settings.custom_base_formula);
        println!(
            "custom multiplier:  {}",
            settings.custom_slot_multiplier_formula
        );
    }

    let costs: Vec<_> = settings
        .cost_by_slot_level
        .iter()
        .map(|(level, formula)| format!("{level}:{formula}"))
        .collect();
    println!("costs:              {}", costs.join(" "));
}
