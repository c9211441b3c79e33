//! Hook that settles spell casts on character updates.

use spellpoints_core::{CastEvent, SettlementOutcome, settle_cast};
use tracing::{debug, info};

use super::{HookContext, HookCriticality, HookEffect, HookOutput, HostHook};
use crate::error::{Result, RuntimeError};
use crate::event::{HookEvent, HostEvent};

/// Rewrites slot-consuming character updates into point debits.
///
/// Runs first on pre-update events: the update it returns is what the host
/// commits, so a failure aborts the dispatch.
#[derive(Debug, Clone, Copy)]
pub struct CastSettlementHook;

impl HostHook for CastSettlementHook {
    fn name(&self) -> &'static str {
        "cast_settlement"
    }

    fn events(&self) -> &'static [HookEvent] {
        &[HookEvent::PreUpdateCharacter]
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        ctx.pending.is_some_and(|update| update.touches_slots())
    }

    fn handle(&self, ctx: &HookContext<'_>) -> Result<HookOutput> {
        let (HostEvent::PreUpdateCharacter { character, .. }, Some(pending)) =
            (ctx.event, ctx.pending)
        else {
            return Err(RuntimeError::UnexpectedEvent {
                hook: self.name(),
                event: ctx.event.kind(),
            });
        };

        if let Some(cast) = CastEvent::detect(character, pending) {
            debug!(
                target: "spellpoints::cast",
                actor = %character.id,
                tier = %cast.tier,
                slots = cast.slots_consumed(),
                "Slot consumption detected"
            );
        }

        let settlement = settle_cast(character, pending.clone(), &ctx.rules());

        match &settlement.outcome {
            SettlementOutcome::PassThrough(reason) => {
                debug!(target: "spellpoints::cast", actor = %character.id, ?reason, "Update passed through");
                return Ok(HookOutput::none());
            }
            SettlementOutcome::Debited { tier, cost, remaining } => info!(
                target: "spellpoints::cast",
                actor = %character.id,
                tier = %tier,
                cost,
                remaining,
                "Spell points debited"
            ),
            outcome => info!(
                target: "spellpoints::cast",
                actor = %character.id,
                ?outcome,
                "Cast settled"
            ),
        }

        Ok(HookOutput::new(
            HookEffect::RewriteUpdate(settlement.update),
            settlement.notices,
        ))
    }
}
