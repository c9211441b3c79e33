//! Message templates.

use std::collections::HashMap;

use spellpoints_core::Message;

const ENGLISH: [(&str, &str); 12] = [
    (
        "spellUsingSpellPoints",
        "{ActorName} used {spellPointUsed} {SpellPoints}, {remainingPoints} remaining.",
    ),
    (
        "notEnoughSp",
        "{ActorName} does not have enough {SpellPoints} to cast this spell.",
    ),
    (
        "castedLife",
        "{ActorName} cast the spell with their life force and lost {hpMaxLost} maximum hit points.",
    ),
    (
        "castedLifeDead",
        "{ActorName} cast the spell with their last breath and died.",
    ),
    (
        "actorNoSP",
        "{ActorName} has no '{SpellPoints}' resource on their character sheet.",
    ),
    (
        "createNewResource",
        "Create a resource named '{SpellPoints}' on the character sheet to use spell points.",
    ),
    (
        "maxUpdated",
        "Maximum {SpellPoints} of {ActorName} updated to {max}.",
    ),
    (
        "resourceMissingForMax",
        "Cannot find resource '{SpellPoints}' on {ActorName} character sheet.",
    ),
    ("formulaFailed", "Spell points formula failed: {reason}"),
    (
        "youNotEnough",
        "You don't have enough '{SpellPoints}' to cast this spell.",
    ),
    (
        "pleaseCreate",
        "Please create a resource named '{SpellPoints}' to use spell points.",
    ),
    ("spellCost", "{cost} {SpellPoints}"),
];

/// Renders [`Message`]s from `{Param}` templates keyed by message name.
#[derive(Clone, Debug)]
pub struct Localizer {
    templates: HashMap<String, String>,
}

impl Localizer {
    pub fn english() -> Self {
        Self {
            templates: ENGLISH
                .iter()
                .map(|(name, template)| ((*name).to_owned(), (*template).to_owned()))
                .collect(),
        }
    }

    /// Overrides one template (builder pattern).
    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }

    /// Renders `message`; unknown messages render as their key.
    pub fn render(&self, message: &Message) -> String {
        let Some(template) = self.templates.get(message.name()) else {
            return message.key();
        };

        message
            .params()
            .into_iter()
            .fold(template.clone(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), &value)
            })
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::english()
    }
}
