use super::cost::cost_to_cast;
use super::gate::gate;
use super::locator::locate;
use super::{RuleContext, RuleError};
use crate::config::MAX_SLOT_LEVEL;
use crate::notice::{Message, Notice, NoticeLevel};
use crate::state::{CharacterRecord, ItemRecord, SpellTier};

/// Point cost shown next to one slot level option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCost {
    pub level: u8,
    /// Option stands for the pact slot rather than a standard tier.
    pub pact: bool,
    pub cost: i64,
}

impl LevelCost {
    pub fn label(&self, resource: &str) -> Message {
        Message::SpellCost {
            level: self.level,
            cost: self.cost,
            resource: resource.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogWarning {
    /// Character has no pool resource.
    MissingResource,
    /// Pool cannot cover the spell at its base level.
    NotEnough { cost: i64, available: i64 },
    /// A cost formula could not be evaluated.
    FormulaFailed(RuleError),
}

impl DialogWarning {
    pub fn message(&self, resource: &str) -> Message {
        match self {
            Self::MissingResource => Message::PleaseCreate {
                resource: resource.to_owned(),
            },
            Self::NotEnough { .. } => Message::YouNotEnough {
                resource: resource.to_owned(),
            },
            Self::FormulaFailed(error) => Message::FormulaFailed {
                reason: error.to_string(),
            },
        }
    }
}

/// What the cast dialog should show for a spell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastDialog {
    pub options: Vec<LevelCost>,
    pub warnings: Vec<DialogWarning>,
}

/// Cost labels and warnings for the cast dialog of `item`.
///
/// `None` when the rules do not apply: gated character, not a spell, or a
/// cantrip.
pub fn assess_cast_dialog(
    character: &CharacterRecord,
    item: &ItemRecord,
    ctx: &RuleContext<'_>,
) -> Option<CastDialog> {
    if !gate(character, ctx.settings).is_active() || !item.is_spell() {
        return None;
    }
    let base_level = u8::try_from(item.level).ok().filter(|level| *level > 0)?;

    let mut dialog = CastDialog::default();

    let Ok(pool) = locate(character, ctx.settings) else {
        dialog.warnings.push(DialogWarning::MissingResource);
        return Some(dialog);
    };

    let bindings = character.bindings();

    for level in base_level..=MAX_SLOT_LEVEL {
        let owned = SpellTier::from_level(level)
            .and_then(|tier| character.spells.slot(tier))
            .is_some_and(|slot| slot.capacity() > 0);
        if !owned {
            continue;
        }
        match cost_to_cast(level, &bindings, ctx) {
            Ok(cost) => dialog.options.push(LevelCost {
                level,
                pact: false,
                cost,
            }),
            Err(error) => dialog.warnings.push(DialogWarning::FormulaFailed(error)),
        }
    }

    let pact_level = character.spells.pact_level;
    let owns_pact = character
        .spells
        .slot(SpellTier::Pact)
        .is_some_and(|slot| slot.capacity() > 0);
    if owns_pact && pact_level >= base_level {
        match cost_to_cast(pact_level, &bindings, ctx) {
            Ok(cost) => dialog.options.push(LevelCost {
                level: pact_level,
                pact: true,
                cost,
            }),
            Err(error) => dialog.warnings.push(DialogWarning::FormulaFailed(error)),
        }
    }

    match cost_to_cast(base_level, &bindings, ctx) {
        Ok(cost) if pool.value - cost < 0 => dialog.warnings.push(DialogWarning::NotEnough {
            cost,
            available: pool.value,
        }),
        Ok(_) => {}
        Err(error) => {
            if !dialog.warnings.contains(&DialogWarning::FormulaFailed(error.clone())) {
                dialog.warnings.push(DialogWarning::FormulaFailed(error));
            }
        }
    }

    Some(dialog)
}

/// Decision taken when the user confirms the cast dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastConfirmation {
    Proceed,
    /// Close the dialog without casting.
    Block(Notice),
}

/// Checks the pool once the user picked a level and confirmed.
///
/// Casting without consuming a slot, or with the hit point variant on, always
/// proceeds. Otherwise the pool must cover the cost of `selected_level`.
pub fn confirm_cast(
    character: &CharacterRecord,
    item: &ItemRecord,
    selected_level: u8,
    consume_slot: bool,
    ctx: &RuleContext<'_>,
) -> CastConfirmation {
    let settings = ctx.settings;

    if !gate(character, settings).is_active() || !item.is_spell() {
        return CastConfirmation::Proceed;
    }
    if !consume_slot || settings.variant_hp_payment {
        return CastConfirmation::Proceed;
    }
    // Without a pool the dialog is left untouched.
    let Ok(pool) = locate(character, settings) else {
        return CastConfirmation::Proceed;
    };

    let resource = settings.resource_name.clone();
    match cost_to_cast(selected_level, &character.bindings(), ctx) {
        Ok(cost) if pool.value - cost < 0 => CastConfirmation::Block(Notice::toast(
            NoticeLevel::Error,
            Message::YouNotEnough { resource },
        )),
        Ok(_) => CastConfirmation::Proceed,
        Err(error) => CastConfirmation::Block(Notice::toast(
            NoticeLevel::Error,
            Message::FormulaFailed {
                reason: error.to_string(),
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::formula::ExpressionEvaluator;
    use crate::rules::fixtures;
    use crate::state::SpellSlot;

    fn enabled() -> Settings {
        Settings {
            enabled: true,
            ..Settings::new()
        }
    }

    fn magic_missile() -> ItemRecord {
        ItemRecord::spell("spell-mm", "Magic Missile", 1)
    }

    #[test]
    fn labels_every_owned_level_from_base() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);

        let dialog = assess_cast_dialog(&fixtures::wizard(), &magic_missile(), &ctx).unwrap();

        let costs: Vec<_> = dialog.options.iter().map(|o| (o.level, o.cost)).collect();
        assert_eq!(costs, vec![(1, 2), (2, 3), (3, 5)]);
        assert!(dialog.warnings.is_empty());
    }

    #[test]
    fn pact_option_is_listed_separately() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let mut character = fixtures::wizard();
        character.spells = character
            .spells
            .with_slot(SpellTier::Pact, SpellSlot::new(1, 1))
            .with_pact_level(2);

        let dialog = assess_cast_dialog(&character, &magic_missile(), &ctx).unwrap();

        assert!(dialog.options.contains(&LevelCost {
            level: 2,
            pact: true,
            cost: 3,
        }));
    }

    #[test]
    fn warns_when_pool_cannot_cover_base_level() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let character = fixtures::with_pool(fixtures::wizard(), 1, 20);

        let dialog = assess_cast_dialog(&character, &magic_missile(), &ctx).unwrap();

        assert_eq!(
            dialog.warnings,
            vec![DialogWarning::NotEnough {
                cost: 2,
                available: 1,
            }]
        );
    }

    #[test]
    fn warns_when_pool_is_missing() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let character = fixtures::without_pool(fixtures::wizard());

        let dialog = assess_cast_dialog(&character, &magic_missile(), &ctx).unwrap();

        assert_eq!(dialog.warnings, vec![DialogWarning::MissingResource]);
        assert!(dialog.options.is_empty());
    }

    #[test]
    fn cantrips_and_other_items_are_ignored() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let character = fixtures::wizard();

        let cantrip = ItemRecord::spell("spell-fb", "Fire Bolt", 0);
        assert_eq!(assess_cast_dialog(&character, &cantrip, &ctx), None);

        let class = ItemRecord::class("class-wizard", "Wizard", 5, Default::default());
        assert_eq!(assess_cast_dialog(&character, &class, &ctx), None);
    }

    #[test]
    fn blocks_when_selected_level_is_too_expensive() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let character = fixtures::with_pool(fixtures::wizard(), 4, 20);

        assert_eq!(
            confirm_cast(&character, &magic_missile(), 2, true, &ctx),
            CastConfirmation::Proceed
        );
        assert!(matches!(
            confirm_cast(&character, &magic_missile(), 3, true, &ctx),
            CastConfirmation::Block(Notice {
                message: Message::YouNotEnough { .. },
                ..
            })
        ));
    }

    #[test]
    fn proceeds_without_slot_or_with_variant() {
        let settings = enabled();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let character = fixtures::with_pool(fixtures::wizard(), 0, 20);

        assert_eq!(
            confirm_cast(&character, &magic_missile(), 3, false, &ctx),
            CastConfirmation::Proceed
        );

        let variant = Settings {
            variant_hp_payment: true,
            ..enabled()
        };
        let ctx = RuleContext::new(&variant, &ExpressionEvaluator);
        assert_eq!(
            confirm_cast(&character, &magic_missile(), 3, true, &ctx),
            CastConfirmation::Proceed
        );
    }
}
