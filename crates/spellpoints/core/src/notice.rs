//! User-facing notices produced by the rules.
//!
//! Rules never talk to the host's UI. They return [`Notice`] values and the
//! runtime renders and delivers them. Each [`Message`] carries a stable
//! localization key under the module namespace plus the parameters its
//! template needs.

use crate::config::MODULE_NAME;

/// Notification level understood by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Where a notice is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Delivery {
    /// Chat card spoken by the named character.
    Chat { speaker: String },
    /// Transient notification for the acting user.
    Toast,
}

/// Localizable message with its template parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Points were debited for a cast.
    SpellPointsUsed {
        actor: String,
        resource: String,
        used: i64,
        remaining: i64,
    },
    /// Pool could not cover a cast and nothing was charged.
    NotEnoughPoints { actor: String, resource: String },
    /// Shortfall paid with maximum hit points.
    CastedLife { actor: String, hp_max_lost: i64 },
    /// Shortfall payment killed the caster.
    CastedLifeDead { actor: String },
    /// Character has no pool resource.
    ActorHasNoPool { actor: String, resource: String },
    /// Hint to create the pool resource.
    CreatePoolResource { resource: String },
    /// Pool maximum was recalculated.
    MaximumUpdated { actor: String, resource: String, max: i64 },
    /// Maximum could not be written because the pool is missing.
    PoolMissingForMaximum { actor: String, resource: String },
    /// A configured formula could not be evaluated.
    FormulaFailed { reason: String },
    /// Cast dialog warning: the pool cannot cover the spell.
    YouNotEnough { resource: String },
    /// Cast dialog warning: the pool resource is missing.
    PleaseCreate { resource: String },
    /// Cost label of one level in the cast dialog.
    SpellCost { level: u8, cost: i64, resource: String },
}

impl Message {
    /// Localization key, e.g. `dnd5e-spellpoints.notEnoughSp`.
    pub fn key(&self) -> String {
        format!("{MODULE_NAME}.{}", self.name())
    }

    /// Key without the module namespace.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SpellPointsUsed { .. } => "spellUsingSpellPoints",
            Self::NotEnoughPoints { .. } => "notEnoughSp",
            Self::CastedLife { .. } => "castedLife",
            Self::CastedLifeDead { .. } => "castedLifeDead",
            Self::ActorHasNoPool { .. } => "actorNoSP",
            Self::CreatePoolResource { .. } => "createNewResource",
            Self::MaximumUpdated { .. } => "maxUpdated",
            Self::PoolMissingForMaximum { .. } => "resourceMissingForMax",
            Self::FormulaFailed { .. } => "formulaFailed",
            Self::YouNotEnough { .. } => "youNotEnough",
            Self::PleaseCreate { .. } => "pleaseCreate",
            Self::SpellCost { .. } => "spellCost",
        }
    }

    /// Template parameters as `(placeholder, value)` pairs.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::SpellPointsUsed {
                actor,
                resource,
                used,
                remaining,
            } => vec![
                ("ActorName", actor.clone()),
                ("SpellPoints", resource.clone()),
                ("spellPointUsed", used.to_string()),
                ("remainingPoints", remaining.to_string()),
            ],
            Self::NotEnoughPoints { actor, resource } | Self::ActorHasNoPool { actor, resource } => {
                vec![("ActorName", actor.clone()), ("SpellPoints", resource.clone())]
            }
            Self::CastedLife { actor, hp_max_lost } => vec![
                ("ActorName", actor.clone()),
                ("hpMaxLost", hp_max_lost.to_string()),
            ],
            Self::CastedLifeDead { actor } => vec![("ActorName", actor.clone())],
            Self::CreatePoolResource { resource }
            | Self::YouNotEnough { resource }
            | Self::PleaseCreate { resource } => vec![("SpellPoints", resource.clone())],
            Self::MaximumUpdated {
                actor,
                resource,
                max,
            } => vec![
                ("ActorName", actor.clone()),
                ("SpellPoints", resource.clone()),
                ("max", max.to_string()),
            ],
            Self::PoolMissingForMaximum { actor, resource } => {
                vec![("ActorName", actor.clone()), ("SpellPoints", resource.clone())]
            }
            Self::FormulaFailed { reason } => vec![("reason", reason.clone())],
            Self::SpellCost {
                level,
                cost,
                resource,
            } => vec![
                ("level", level.to_string()),
                ("cost", cost.to_string()),
                ("SpellPoints", resource.clone()),
            ],
        }
    }
}

/// Message addressed to a delivery surface at a level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notice {
    pub level: NoticeLevel,
    pub delivery: Delivery,
    pub message: Message,
}

impl Notice {
    pub fn chat(level: NoticeLevel, speaker: impl Into<String>, message: Message) -> Self {
        Self {
            level,
            delivery: Delivery::Chat {
                speaker: speaker.into(),
            },
            message,
        }
    }

    pub fn toast(level: NoticeLevel, message: Message) -> Self {
        Self {
            level,
            delivery: Delivery::Toast,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        let message = Message::NotEnoughPoints {
            actor: "Elora".into(),
            resource: "Spell Points".into(),
        };
        assert_eq!(message.key(), "dnd5e-spellpoints.notEnoughSp");
    }

    #[test]
    fn used_message_exposes_balance_params() {
        let message = Message::SpellPointsUsed {
            actor: "Elora".into(),
            resource: "Spell Points".into(),
            used: 5,
            remaining: 5,
        };
        let params = message.params();
        assert!(params.contains(&("spellPointUsed", "5".to_owned())));
        assert!(params.contains(&("remainingPoints", "5".to_owned())));
    }
}
