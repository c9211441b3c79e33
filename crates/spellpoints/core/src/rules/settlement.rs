//! Cast settlement.
//!
//! Turns a proposed update that consumes a spell slot into one that keeps the
//! slot full and pays with points instead. When the pool runs short the
//! shortfall is either paid with maximum hit points (variant rule) or waived.
//!
//! ```text
//! gate ─► slot fields? ─► slot consumed? ─► pool located? ─► refund slot ─► cost
//!   │          │               │                  │                         │
//!   └──────────┴───────────────┴─ pass through    └─ veto (empty update)    ▼
//!                                                           debit │ pay with life │ waive
//! ```

use super::cost::cost_for_tier;
use super::gate::{GateDecision, gate};
use super::locator::locate;
use super::{RuleContext, RuleError};
use crate::formula::evaluate_finite;
use crate::notice::{Message, Notice, NoticeLevel};
use crate::state::{
    CharacterRecord, DeathSavePatch, DeathSaves, HpPatch, PendingUpdate, SpellTier,
};

/// Slot consumption detected in a proposed update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastEvent {
    pub tier: SpellTier,
    pub pre_cast: i64,
    pub post_cast: i64,
    /// Stored maximum of the tier, if the host ever set one.
    pub slot_max: Option<i64>,
}

impl CastEvent {
    /// First tier, in [`SpellTier::ORDERED`] order, whose proposed count is
    /// lower than the stored one.
    ///
    /// Increases are not casts: a rest or manual edit restoring slots passes
    /// through without touching the pool.
    pub fn detect(character: &CharacterRecord, update: &PendingUpdate) -> Option<Self> {
        SpellTier::ORDERED.into_iter().find_map(|tier| {
            let post_cast = update.slot(tier)?.value?;
            let stored = character.spells.slot(tier).copied().unwrap_or_default();

            (post_cast < stored.value).then_some(Self {
                tier,
                pre_cast: stored.value,
                post_cast,
                slot_max: stored.max,
            })
        })
    }

    /// Slots the host wanted to spend.
    pub const fn slots_consumed(&self) -> i64 {
        self.pre_cast - self.post_cast
    }
}

/// Why an update went through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassReason {
    Gated(GateDecision),
    NoSlotChange,
    /// Slot counts changed without any tier decreasing.
    NoSlotConsumed,
}

/// Why a cast was vetoed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VetoReason {
    ResourceNotFound,
    CostUnavailable(RuleError),
}

/// Result of settling one proposed update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    PassThrough(PassReason),
    /// Slot consumption suppressed; the host receives an empty update.
    Vetoed(VetoReason),
    Debited {
        tier: SpellTier,
        cost: i64,
        remaining: i64,
    },
    /// Pool emptied and the shortfall taken from maximum hit points.
    PaidWithLife {
        tier: SpellTier,
        cost: i64,
        hp_max_lost: i64,
        hp_clamped: bool,
    },
    /// Paying with hit points dropped the effective maximum to zero or below.
    CastToDeath { tier: SpellTier, cost: i64 },
    /// Pool too low and the variant rule is off: nothing is charged.
    Insufficient {
        tier: SpellTier,
        cost: i64,
        available: i64,
    },
}

impl SettlementOutcome {
    /// Whether the update handed back differs from the proposed one.
    pub const fn rewrites(&self) -> bool {
        !matches!(self, Self::PassThrough(_))
    }
}

/// Rewritten update plus everything the acting user should be told.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub update: PendingUpdate,
    pub outcome: SettlementOutcome,
    pub notices: Vec<Notice>,
}

impl Settlement {
    fn pass(update: PendingUpdate, reason: PassReason) -> Self {
        Self {
            update,
            outcome: SettlementOutcome::PassThrough(reason),
            notices: Vec::new(),
        }
    }

    fn veto(reason: VetoReason, notices: Vec<Notice>) -> Self {
        Self {
            update: PendingUpdate::new(),
            outcome: SettlementOutcome::Vetoed(reason),
            notices,
        }
    }
}

/// Settles a proposed character update.
///
/// Always returns an update the host can commit: the proposal itself, a
/// rewritten copy, or an empty update when the cast is vetoed.
pub fn settle_cast(
    character: &CharacterRecord,
    update: PendingUpdate,
    ctx: &RuleContext<'_>,
) -> Settlement {
    let settings = ctx.settings;

    let decision = gate(character, settings);
    if !decision.is_active() {
        return Settlement::pass(update, PassReason::Gated(decision));
    }
    if !update.touches_slots() {
        return Settlement::pass(update, PassReason::NoSlotChange);
    }
    let Some(cast) = CastEvent::detect(character, &update) else {
        return Settlement::pass(update, PassReason::NoSlotConsumed);
    };

    let actor = character.name.as_str();
    let resource = settings.resource_name.as_str();

    let Ok(pool) = locate(character, settings) else {
        return Settlement::veto(
            VetoReason::ResourceNotFound,
            vec![
                Notice::chat(
                    NoticeLevel::Error,
                    actor,
                    Message::ActorHasNoPool {
                        actor: actor.to_owned(),
                        resource: resource.to_owned(),
                    },
                ),
                Notice::toast(
                    NoticeLevel::Error,
                    Message::CreatePoolResource {
                        resource: resource.to_owned(),
                    },
                ),
            ],
        );
    };

    let bindings = character.bindings();
    let cost = match cost_for_tier(cast.tier, &character.spells, &bindings, ctx) {
        Ok(cost) => cost,
        Err(error) => return cost_failure(error),
    };

    let mut update = update;

    // Slots are never spent: write the tier back to its maximum.
    let refund = update.slot_mut(cast.tier);
    match cast.slot_max {
        Some(max) => refund.value = Some(max),
        None => {
            refund.value = Some(1);
            refund.max = Some(1);
        }
    }

    let mut notices = Vec::new();
    let mut pool_value = pool.value;

    let outcome = if pool.value - cost >= 0 {
        pool_value = pool.value - cost;
        notices.push(Notice::chat(
            NoticeLevel::Info,
            actor,
            Message::SpellPointsUsed {
                actor: actor.to_owned(),
                resource: resource.to_owned(),
                used: cost,
                remaining: pool_value,
            },
        ));
        SettlementOutcome::Debited {
            tier: cast.tier,
            cost,
            remaining: pool_value,
        }
    } else if settings.variant_hp_payment {
        let per_point = match evaluate_finite(ctx.evaluator, &settings.hp_cost_per_point, &bindings)
        {
            Ok(per_point) => per_point,
            Err(error) => return cost_failure(error.into()),
        };
        pool_value = 0;
        pay_with_life(character, &mut update, cast.tier, cost, per_point, &mut notices)
    } else {
        notices.push(Notice::chat(
            NoticeLevel::Error,
            actor,
            Message::NotEnoughPoints {
                actor: actor.to_owned(),
                resource: resource.to_owned(),
            },
        ));
        SettlementOutcome::Insufficient {
            tier: cast.tier,
            cost,
            available: pool.value,
        }
    };

    update.set_resource_value(pool.key.clone(), pool_value);

    Settlement {
        update,
        outcome,
        notices,
    }
}

/// Takes `cost × per_point` from the temporary maximum hit points.
///
/// The rate may be fractional; only the product is rounded.
fn pay_with_life(
    character: &CharacterRecord,
    update: &mut PendingUpdate,
    tier: SpellTier,
    cost: i64,
    per_point: f64,
    notices: &mut Vec<Notice>,
) -> SettlementOutcome {
    let actor = character.name.as_str();
    let hp = character.attributes.hp;

    let hp_max_lost = (cost as f64 * per_point).round() as i64;
    let tempmax = hp.tempmax.unwrap_or(0) - hp_max_lost;
    let effective_max = hp.max + tempmax;

    if effective_max <= 0 {
        update.death_save_change = Some(DeathSavePatch {
            failure: DeathSaves::MAX_FAILURES,
        });
        update.hp_change = Some(HpPatch {
            value: Some(0),
            tempmax: Some(-hp.max),
        });
        notices.push(Notice::chat(
            NoticeLevel::Error,
            actor,
            Message::CastedLifeDead {
                actor: actor.to_owned(),
            },
        ));
        return SettlementOutcome::CastToDeath { tier, cost };
    }

    let hp_clamped = hp.value > effective_max;
    update.hp_change = Some(HpPatch {
        value: hp_clamped.then_some(effective_max),
        tempmax: Some(tempmax),
    });
    notices.push(Notice::chat(
        NoticeLevel::Error,
        actor,
        Message::CastedLife {
            actor: actor.to_owned(),
            hp_max_lost,
        },
    ));

    SettlementOutcome::PaidWithLife {
        tier,
        cost,
        hp_max_lost,
        hp_clamped,
    }
}

fn cost_failure(error: RuleError) -> Settlement {
    let notice = Notice::toast(
        NoticeLevel::Error,
        Message::FormulaFailed {
            reason: error.to_string(),
        },
    );
    Settlement::veto(VetoReason::CostUnavailable(error), vec![notice])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::formula::ExpressionEvaluator;
    use crate::rules::fixtures;
    use crate::state::{CharacterKind, HitPoints, SpellSlot};

    fn enabled() -> Settings {
        Settings {
            enabled: true,
            ..Settings::new()
        }
    }

    fn cast_third() -> PendingUpdate {
        PendingUpdate::new().with_slot_value(SpellTier::Spell3, 1)
    }

    fn settle(character: &CharacterRecord, update: PendingUpdate, settings: &Settings) -> Settlement {
        settle_cast(character, update, &RuleContext::new(settings, &ExpressionEvaluator))
    }

    #[test]
    fn debits_pool_and_refunds_slot() {
        let settings = enabled();
        let character = fixtures::wizard();

        let settlement = settle(&character, cast_third(), &settings);

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::Debited {
                tier: SpellTier::Spell3,
                cost: 5,
                remaining: 5,
            }
        );
        assert_eq!(settlement.update.slot(SpellTier::Spell3).unwrap().value, Some(2));
        assert_eq!(settlement.update.resource("primary").unwrap().value, Some(5));
        assert!(matches!(
            &settlement.notices[..],
            [Notice {
                level: NoticeLevel::Info,
                message: Message::SpellPointsUsed { used: 5, remaining: 5, .. },
                ..
            }]
        ));
    }

    #[test]
    fn exact_balance_is_enough() {
        let settings = enabled();
        let character = fixtures::with_pool(fixtures::wizard(), 5, 20);

        let settlement = settle(&character, cast_third(), &settings);

        assert!(matches!(
            settlement.outcome,
            SettlementOutcome::Debited { remaining: 0, .. }
        ));
    }

    #[test]
    fn insufficient_points_charge_nothing() {
        let settings = enabled();
        let character = fixtures::with_pool(fixtures::wizard(), 2, 20);

        let settlement = settle(&character, cast_third(), &settings);

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::Insufficient {
                tier: SpellTier::Spell3,
                cost: 5,
                available: 2,
            }
        );
        assert_eq!(settlement.update.resource("primary").unwrap().value, Some(2));
        assert_eq!(settlement.update.slot(SpellTier::Spell3).unwrap().value, Some(2));
        assert!(settlement.notices[0].is_error());
    }

    #[test]
    fn shortfall_reduces_maximum_hit_points() {
        let settings = Settings {
            variant_hp_payment: true,
            ..enabled()
        };
        let mut character = fixtures::with_pool(fixtures::wizard(), 0, 20);
        character.attributes.hp = HitPoints {
            value: 25,
            max: 30,
            tempmax: Some(0),
        };

        let settlement = settle(&character, cast_third(), &settings);

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::PaidWithLife {
                tier: SpellTier::Spell3,
                cost: 5,
                hp_max_lost: 10,
                hp_clamped: true,
            }
        );
        assert_eq!(
            settlement.update.hp_change,
            Some(HpPatch {
                value: Some(20),
                tempmax: Some(-10),
            })
        );
        assert_eq!(settlement.update.resource("primary").unwrap().value, Some(0));
        assert_eq!(settlement.update.death_save_change, None);
    }

    #[test]
    fn hit_points_below_new_maximum_are_kept() {
        let settings = Settings {
            variant_hp_payment: true,
            ..enabled()
        };
        let mut character = fixtures::with_pool(fixtures::wizard(), 0, 20);
        character.attributes.hp = HitPoints::new(12, 30);

        let settlement = settle(&character, cast_third(), &settings);

        assert_eq!(
            settlement.update.hp_change,
            Some(HpPatch {
                value: None,
                tempmax: Some(-10),
            })
        );
    }

    #[test]
    fn fractional_life_cost_rounds_the_total_once() {
        let settings = Settings {
            variant_hp_payment: true,
            hp_cost_per_point: "1.5".into(),
            ..enabled()
        };
        let mut character = fixtures::with_pool(fixtures::wizard(), 0, 20);
        character.attributes.hp = HitPoints {
            value: 30,
            max: 30,
            tempmax: Some(0),
        };

        let settlement = settle(&character, cast_third(), &settings);

        // 5 points at 1.5 each is 7.5
        assert_eq!(
            settlement.outcome,
            SettlementOutcome::PaidWithLife {
                tier: SpellTier::Spell3,
                cost: 5,
                hp_max_lost: 8,
                hp_clamped: true,
            }
        );
        assert_eq!(
            settlement.update.hp_change,
            Some(HpPatch {
                value: Some(22),
                tempmax: Some(-8),
            })
        );
    }

    #[test]
    fn lethal_overdraft_defeats_caster() {
        let settings = Settings {
            variant_hp_payment: true,
            ..enabled()
        };
        let mut character = fixtures::with_pool(fixtures::wizard(), 0, 20);
        character.attributes.hp = HitPoints {
            value: 8,
            max: 8,
            tempmax: Some(0),
        };

        let settlement = settle(&character, cast_third(), &settings);

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::CastToDeath {
                tier: SpellTier::Spell3,
                cost: 5,
            }
        );
        assert_eq!(
            settlement.update.hp_change,
            Some(HpPatch {
                value: Some(0),
                tempmax: Some(-8),
            })
        );
        assert_eq!(
            settlement.update.death_save_change,
            Some(DeathSavePatch { failure: 3 })
        );
        assert!(matches!(
            settlement.notices[0].message,
            Message::CastedLifeDead { .. }
        ));
    }

    #[test]
    fn missing_pool_vetoes_cast() {
        let settings = enabled();
        let character = fixtures::without_pool(fixtures::wizard());

        let settlement = settle(&character, cast_third(), &settings);

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::Vetoed(VetoReason::ResourceNotFound)
        );
        assert!(settlement.update.is_empty());
        assert_eq!(settlement.notices.len(), 2);
        assert!(settlement.notices.iter().all(Notice::is_error));
    }

    #[test]
    fn gated_updates_pass_through() {
        let character = fixtures::wizard();

        let settlement = settle(&character, cast_third(), &Settings::new());
        assert_eq!(
            settlement.outcome,
            SettlementOutcome::PassThrough(PassReason::Gated(GateDecision::Disabled))
        );
        assert_eq!(settlement.update, cast_third());

        let mut npc = fixtures::wizard();
        npc.kind = CharacterKind::Npc;
        let settlement = settle(&npc, cast_third(), &enabled());
        assert!(!settlement.outcome.rewrites());
    }

    #[test]
    fn updates_without_slots_pass_through() {
        let update = PendingUpdate::new().with_resource_value("primary", 3);

        let settlement = settle(&fixtures::wizard(), update.clone(), &enabled());

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::PassThrough(PassReason::NoSlotChange)
        );
        assert_eq!(settlement.update, update);
    }

    #[test]
    fn restoring_slots_is_not_a_cast() {
        let mut character = fixtures::wizard();
        character.spells.slot_mut(SpellTier::Spell1).value = 1;
        let update = PendingUpdate::new().with_slot_value(SpellTier::Spell1, 4);

        let settlement = settle(&character, update, &enabled());

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::PassThrough(PassReason::NoSlotConsumed)
        );
    }

    #[test]
    fn unset_slot_maximum_defaults_to_one() {
        let mut character = fixtures::wizard();
        character.spells.slots.insert(
            SpellTier::Spell4,
            SpellSlot {
                value: 1,
                max: None,
            },
        );
        let update = PendingUpdate::new().with_slot_value(SpellTier::Spell4, 0);

        let settlement = settle(&character, update, &enabled());

        let slot = settlement.update.slot(SpellTier::Spell4).unwrap();
        assert_eq!((slot.value, slot.max), (Some(1), Some(1)));
    }

    #[test]
    fn pact_slot_costs_pact_level() {
        let mut character = fixtures::wizard();
        character.spells = character
            .spells
            .with_slot(SpellTier::Pact, SpellSlot::new(2, 2))
            .with_pact_level(2);
        let update = PendingUpdate::new().with_slot_value(SpellTier::Pact, 1);

        let settlement = settle(&character, update, &enabled());

        assert_eq!(
            settlement.outcome,
            SettlementOutcome::Debited {
                tier: SpellTier::Pact,
                cost: 3,
                remaining: 7,
            }
        );
    }

    #[test]
    fn first_consumed_tier_is_the_cast() {
        let update = PendingUpdate::new()
            .with_slot_value(SpellTier::Spell2, 2)
            .with_slot_value(SpellTier::Spell3, 1);

        let cast = CastEvent::detect(&fixtures::wizard(), &update).unwrap();

        assert_eq!(cast.tier, SpellTier::Spell2);
        assert_eq!(cast.slots_consumed(), 1);
    }

    #[test]
    fn broken_cost_formula_vetoes_cast() {
        let mut settings = enabled();
        settings.cost_by_slot_level.insert(3, "@nope + 1".into());

        let settlement = settle(&fixtures::wizard(), cast_third(), &settings);

        assert!(matches!(
            settlement.outcome,
            SettlementOutcome::Vetoed(VetoReason::CostUnavailable(RuleError::Formula(_)))
        ));
        assert!(settlement.update.is_empty());
    }

    #[test]
    fn settled_pool_never_goes_negative() {
        for variant in [false, true] {
            let settings = Settings {
                variant_hp_payment: variant,
                ..enabled()
            };
            for value in 0..=6 {
                let character = fixtures::with_pool(fixtures::wizard(), value, 20);
                let settlement = settle(&character, cast_third(), &settings);
                let written = settlement.update.resource("primary").unwrap().value.unwrap();
                assert!(written >= 0);
            }
        }
    }
}
