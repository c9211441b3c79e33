use super::gate::{GateDecision, gate};
use super::locator::locate;
use super::maximum::compute_maximum;
use super::{RuleContext, RuleError};
use crate::notice::{Message, Notice, NoticeLevel};
use crate::state::{CharacterRecord, ItemChange, ItemRecord, PendingUpdate};

/// Why a recalculation did not run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Gated(GateDecision),
    AutoRecalculateOff,
    NotAClass,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecalculationOutcome {
    Skipped(SkipReason),
    ResourceNotFound,
    /// Calculation failed; the stored maximum is kept.
    Failed(RuleError),
    /// Computed maximum of zero; nothing written.
    Unchanged,
    Updated { max: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recalculation {
    /// Update writing the new maximum, when there is one.
    pub update: Option<PendingUpdate>,
    pub outcome: RecalculationOutcome,
    pub notices: Vec<Notice>,
}

impl Recalculation {
    fn without_update(outcome: RecalculationOutcome, notices: Vec<Notice>) -> Self {
        Self {
            update: None,
            outcome,
            notices,
        }
    }
}

/// Recomputes the pool maximum after a class item was created or updated.
///
/// `change` holds the item's proposed, not yet committed, fields.
pub fn recalculate_maximum(
    character: &CharacterRecord,
    item: &ItemRecord,
    change: Option<&ItemChange>,
    ctx: &RuleContext<'_>,
) -> Recalculation {
    let settings = ctx.settings;

    let decision = gate(character, settings);
    if !decision.is_active() {
        return Recalculation::without_update(
            RecalculationOutcome::Skipped(SkipReason::Gated(decision)),
            Vec::new(),
        );
    }
    if !settings.auto_recalculate_max {
        return Recalculation::without_update(
            RecalculationOutcome::Skipped(SkipReason::AutoRecalculateOff),
            Vec::new(),
        );
    }
    if !item.is_class() {
        return Recalculation::without_update(
            RecalculationOutcome::Skipped(SkipReason::NotAClass),
            Vec::new(),
        );
    }

    let actor = character.name.clone();
    let resource = settings.resource_name.clone();

    let Ok(pool) = locate(character, settings) else {
        let notice = Notice::toast(
            NoticeLevel::Error,
            Message::PoolMissingForMaximum { actor, resource },
        );
        return Recalculation::without_update(RecalculationOutcome::ResourceNotFound, vec![notice]);
    };

    let max = match compute_maximum(character, Some((item, change)), ctx) {
        Ok(max) => max,
        Err(error) => {
            let notice = Notice::toast(
                NoticeLevel::Error,
                Message::FormulaFailed {
                    reason: error.to_string(),
                },
            );
            return Recalculation::without_update(RecalculationOutcome::Failed(error), vec![notice]);
        }
    };

    if max <= 0 {
        return Recalculation::without_update(RecalculationOutcome::Unchanged, Vec::new());
    }

    let mut update = PendingUpdate::new();
    update.set_resource_max(pool.key.clone(), max);

    Recalculation {
        update: Some(update),
        outcome: RecalculationOutcome::Updated { max },
        notices: vec![Notice::toast(
            NoticeLevel::Info,
            Message::MaximumUpdated {
                actor,
                resource,
                max,
            },
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormulaPreset, Settings};
    use crate::formula::ExpressionEvaluator;
    use crate::rules::fixtures;
    use crate::state::{Progression, SpellSlots};

    fn auto() -> Settings {
        Settings {
            enabled: true,
            auto_recalculate_max: true,
            ..Settings::new()
        }
    }

    fn wizard_item() -> ItemRecord {
        ItemRecord::class("class-wizard", "Wizard", 5, Progression::Full)
    }

    fn recalc(
        character: &CharacterRecord,
        item: &ItemRecord,
        change: Option<&ItemChange>,
        settings: &Settings,
    ) -> Recalculation {
        recalculate_maximum(
            character,
            item,
            change,
            &RuleContext::new(settings, &ExpressionEvaluator),
        )
    }

    #[test]
    fn level_up_writes_new_maximum() {
        let change = ItemChange::levels(6);

        let result = recalc(&fixtures::wizard(), &wizard_item(), Some(&change), &auto());

        assert_eq!(result.outcome, RecalculationOutcome::Updated { max: 32 });
        let update = result.update.unwrap();
        assert_eq!(update.resource("primary").unwrap().max, Some(32));
        assert_eq!(update.resource("primary").unwrap().value, None);
        assert_eq!(result.notices[0].level, NoticeLevel::Info);
    }

    #[test]
    fn zero_maximum_is_not_written() {
        let mut character = fixtures::wizard();
        character.classes[0].progression = Progression::None;
        let mut item = wizard_item();
        item.progression = Progression::None;

        let result = recalc(&character, &item, None, &auto());

        assert_eq!(result.outcome, RecalculationOutcome::Unchanged);
        assert_eq!(result.update, None);
        assert!(result.notices.is_empty());
    }

    #[test]
    fn custom_mode_without_slots_is_a_no_op() {
        let settings = Settings {
            custom_base_formula: "12".into(),
            ..Settings {
                enabled: true,
                auto_recalculate_max: true,
                ..Settings::with_preset(FormulaPreset::Custom)
            }
        };
        let mut character = fixtures::wizard();
        character.spells = SpellSlots::new();

        let result = recalc(&character, &wizard_item(), None, &settings);

        assert_eq!(result.outcome, RecalculationOutcome::Unchanged);
        assert_eq!(result.update, None);
    }

    #[test]
    fn missing_pool_reports_error() {
        let character = fixtures::without_pool(fixtures::wizard());

        let result = recalc(&character, &wizard_item(), None, &auto());

        assert_eq!(result.outcome, RecalculationOutcome::ResourceNotFound);
        assert!(result.notices[0].is_error());
        assert_eq!(result.update, None);
    }

    #[test]
    fn only_class_items_trigger() {
        let spell = ItemRecord::spell("spell-1", "Fireball", 3);

        let result = recalc(&fixtures::wizard(), &spell, None, &auto());

        assert_eq!(
            result.outcome,
            RecalculationOutcome::Skipped(SkipReason::NotAClass)
        );
    }

    #[test]
    fn auto_recalculation_must_be_on() {
        let settings = Settings {
            auto_recalculate_max: false,
            ..auto()
        };

        let result = recalc(&fixtures::wizard(), &wizard_item(), None, &settings);

        assert_eq!(
            result.outcome,
            RecalculationOutcome::Skipped(SkipReason::AutoRecalculateOff)
        );
    }

    #[test]
    fn failing_formula_keeps_stored_maximum() {
        let settings = Settings {
            custom_base_formula: "@missing".into(),
            ..Settings {
                enabled: true,
                auto_recalculate_max: true,
                ..Settings::with_preset(FormulaPreset::Custom)
            }
        };

        let result = recalc(&fixtures::wizard(), &wizard_item(), None, &settings);

        assert!(matches!(
            result.outcome,
            RecalculationOutcome::Failed(RuleError::Formula(_))
        ));
        assert_eq!(result.update, None);
    }
}
