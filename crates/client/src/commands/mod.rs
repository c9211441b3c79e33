mod cast;
mod cost;
mod recalc;
mod settings;

pub use cast::Cast;
pub use cost::Cost;
pub use recalc::Recalc;
pub use settings::SettingsCommand;

use std::str::FromStr;

use spellpoints_core::{FormulaPreset, SpellTier};

/// Parses a host name (`spell3`, `AM_CUSTOM`) through its `FromStr` impl.
fn parse_named<T: FromStr>(value: &str, kind: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("unknown {kind} `{value}`"))
}

pub(crate) fn parse_tier(value: &str) -> Result<SpellTier, String> {
    parse_named(value, "slot tier")
}

pub(crate) fn parse_preset(value: &str) -> Result<FormulaPreset, String> {
    parse_named(value, "preset")
}
