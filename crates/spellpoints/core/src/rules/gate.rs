use crate::config::Settings;
use crate::state::CharacterRecord;

/// Whether spell point rules apply to a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateDecision {
    Active,
    /// Module switched off.
    Disabled,
    NotPlayerCharacter,
    /// Mixed mode is on and the character has not opted in.
    NotOptedIn,
}

impl GateDecision {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Checks the module switch, the character kind and the mixed-mode opt-in,
/// in that order.
pub fn gate(character: &CharacterRecord, settings: &Settings) -> GateDecision {
    if !settings.enabled {
        GateDecision::Disabled
    } else if !character.is_player_character() {
        GateDecision::NotPlayerCharacter
    } else if settings.mixed_mode_per_actor && !character.opted_in() {
        GateDecision::NotOptedIn
    } else {
        GateDecision::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::state::CharacterKind;

    fn enabled() -> Settings {
        Settings {
            enabled: true,
            ..Settings::new()
        }
    }

    #[test]
    fn disabled_module_gates_everyone() {
        assert_eq!(gate(&fixtures::wizard(), &Settings::new()), GateDecision::Disabled);
    }

    #[test]
    fn npcs_are_never_active() {
        let mut npc = fixtures::wizard();
        npc.kind = CharacterKind::Npc;
        assert_eq!(gate(&npc, &enabled()), GateDecision::NotPlayerCharacter);
    }

    #[test]
    fn mixed_mode_requires_opt_in() {
        let settings = Settings {
            mixed_mode_per_actor: true,
            ..enabled()
        };
        let mut character = fixtures::wizard();
        assert_eq!(gate(&character, &settings), GateDecision::NotOptedIn);

        character.flags.spell_points_enabled = true;
        assert!(gate(&character, &settings).is_active());
    }
}
