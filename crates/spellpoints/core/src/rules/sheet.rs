use crate::config::Settings;
use crate::state::{CharacterRecord, PendingUpdate};

/// Mixed-mode opt-in checkbox shown on a character sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetToggle {
    pub checked: bool,
}

/// Checkbox to render, if any.
///
/// Shown only on player characters while the module and mixed mode are both
/// enabled.
pub fn sheet_toggle(character: &CharacterRecord, settings: &Settings) -> Option<SheetToggle> {
    let visible =
        settings.enabled && settings.mixed_mode_per_actor && character.is_player_character();

    visible.then(|| SheetToggle {
        checked: character.opted_in(),
    })
}

/// Update storing the character's opt-in flag.
pub fn set_opt_in(enabled: bool) -> PendingUpdate {
    PendingUpdate {
        opt_in_change: Some(enabled),
        ..PendingUpdate::default()
    }
}
