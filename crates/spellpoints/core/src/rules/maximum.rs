//! Pool capacity.
//!
//! Two exclusive modes, selected by [`Settings::is_custom_formula`]:
//!
//! - **fixed**: sum the points table entry of each class's effective caster
//!   level
//! - **custom**: `base + Σ(slot max × slot cost) × multiplier`, forced to zero
//!   when the character owns no slots

use super::cost::cost_to_cast;
use super::{RuleContext, RuleError};
use crate::config::Settings;
use crate::formula::{Bindings, FormulaError};
use crate::state::{CharacterRecord, ClassEntry, ItemChange, ItemRecord, SpellSlots};

/// Proposed level of one class whose update is still in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelOverride<'a> {
    pub class_id: &'a str,
    pub level: u32,
}

/// Maximum from the points table, summed across classes.
///
/// A class whose progression has no caster level, or whose effective level is
/// zero, contributes nothing. A caster level beyond the table is an error so
/// the caller leaves the stored maximum alone.
pub fn max_fixed(
    classes: &[ClassEntry],
    level_override: Option<LevelOverride<'_>>,
    settings: &Settings,
) -> Result<i64, RuleError> {
    let mut total = 0;

    for class in classes {
        let level = match level_override {
            Some(change) if change.class_id == class.id => change.level,
            _ => class.level,
        };

        let Some(caster_level) = class.progression.effective_caster_level(level) else {
            continue;
        };
        if caster_level == 0 {
            continue;
        }

        total += settings
            .points_for_level(caster_level)
            .ok_or(RuleError::MissingPointsEntry {
                level: caster_level,
            })?;
    }

    Ok(total)
}

/// Maximum from the custom base and slot multiplier formulas.
///
/// Every tier with capacity contributes `max × cost`; pact slots cost as their
/// pact level and are skipped while that level is unset.
pub fn max_custom(
    slots: &SpellSlots,
    bindings: &Bindings,
    ctx: &RuleContext<'_>,
) -> Result<i64, RuleError> {
    let mut owns_slots = false;
    let mut contribution = 0_i64;

    for (tier, slot) in slots.owned_tiers() {
        let Some(level) = slots.effective_level(tier) else {
            continue;
        };
        owns_slots = true;
        contribution += slot.capacity() * cost_to_cast(level, bindings, ctx)?;
    }

    if !owns_slots {
        return Ok(0);
    }

    let settings = ctx.settings;
    let base = ctx.evaluator.evaluate(&settings.custom_base_formula, bindings)?;
    let multiplier = ctx
        .evaluator
        .evaluate(&settings.custom_slot_multiplier_formula, bindings)?;

    let total = base + contribution as f64 * multiplier;
    if !total.is_finite() {
        return Err(FormulaError::NonFinite {
            formula: settings.custom_base_formula.clone(),
        }
        .into());
    }

    Ok(total.round() as i64)
}

/// Maximum for `character` in the configured mode.
///
/// `changed` is the class item that triggered the recalculation. Its proposed
/// level replaces the stored one, and a freshly created class missing from the
/// character's class list is counted as well.
pub fn compute_maximum(
    character: &CharacterRecord,
    changed: Option<(&ItemRecord, Option<&ItemChange>)>,
    ctx: &RuleContext<'_>,
) -> Result<i64, RuleError> {
    if ctx.settings.is_custom_formula {
        return max_custom(&character.spells, &character.bindings(), ctx);
    }

    let mut classes = character.classes.clone();
    let mut level_override = None;

    if let Some((item, change)) = changed {
        if let Some(entry) = item.as_class_entry() {
            if character.class(&entry.id).is_none() {
                classes.push(entry);
            }
            if let Some(levels) = change.and_then(|change| change.levels) {
                level_override = Some(LevelOverride {
                    class_id: item.id.as_str(),
                    level: levels,
                });
            }
        }
    }

    max_fixed(&classes, level_override, ctx.settings)
}
