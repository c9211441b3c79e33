use super::{RuleContext, RuleError};
use crate::config::MAX_SLOT_LEVEL;
use crate::formula::{Bindings, evaluate_points};
use crate::state::{SpellSlots, SpellTier};

/// Point cost of casting at `slot_level` (1..=9).
pub fn cost_to_cast(
    slot_level: u8,
    bindings: &Bindings,
    ctx: &RuleContext<'_>,
) -> Result<i64, RuleError> {
    if !(1..=MAX_SLOT_LEVEL).contains(&slot_level) {
        return Err(RuleError::MissingCostEntry { level: slot_level });
    }

    let formula = ctx
        .settings
        .cost_formula(slot_level)
        .ok_or(RuleError::MissingCostEntry { level: slot_level })?;

    Ok(evaluate_points(ctx.evaluator, formula, bindings)?)
}

/// Point cost of a slot tier; pact slots cost as their stored pact level.
pub fn cost_for_tier(
    tier: SpellTier,
    slots: &SpellSlots,
    bindings: &Bindings,
    ctx: &RuleContext<'_>,
) -> Result<i64, RuleError> {
    let level = slots
        .effective_level(tier)
        .ok_or(RuleError::PactLevelUnset)?;
    cost_to_cast(level, bindings, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::formula::ExpressionEvaluator;
    use crate::state::SpellSlot;

    #[test]
    fn reads_fixed_cost_table() {
        let settings = Settings::new();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);

        assert_eq!(cost_to_cast(3, &Bindings::new(), &ctx), Ok(5));
        assert_eq!(cost_to_cast(9, &Bindings::new(), &ctx), Ok(13));
    }

    #[test]
    fn evaluates_cost_formulas() {
        let mut settings = Settings::new();
        settings.cost_by_slot_level.insert(2, "@attributes.prof + 1".into());
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let bindings = Bindings::new().with("attributes.prof", 3);

        assert_eq!(cost_to_cast(2, &bindings, &ctx), Ok(4));
    }

    #[test]
    fn cantrips_have_no_cost_entry() {
        let settings = Settings::new();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);

        assert_eq!(
            cost_to_cast(0, &Bindings::new(), &ctx),
            Err(RuleError::MissingCostEntry { level: 0 })
        );
    }

    #[test]
    fn pact_slots_use_pact_level() {
        let settings = Settings::new();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let slots = SpellSlots::new()
            .with_slot(SpellTier::Pact, SpellSlot::new(2, 2))
            .with_pact_level(4);

        assert_eq!(cost_for_tier(SpellTier::Pact, &slots, &Bindings::new(), &ctx), Ok(6));
    }

    #[test]
    fn pact_slots_without_level_fail() {
        let settings = Settings::new();
        let ctx = RuleContext::new(&settings, &ExpressionEvaluator);
        let slots = SpellSlots::new().with_slot(SpellTier::Pact, SpellSlot::new(2, 2));

        assert_eq!(
            cost_for_tier(SpellTier::Pact, &slots, &Bindings::new(), &ctx),
            Err(RuleError::PactLevelUnset)
        );
    }
}
