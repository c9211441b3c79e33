//! Hook that refreshes the pool maximum when class items change.

use spellpoints_core::{RecalculationOutcome, recalculate_maximum};
use tracing::{debug, info, warn};

use super::{HookContext, HookEffect, HookOutput, HostHook};
use crate::error::{Result, RuntimeError};
use crate::event::{HookEvent, HostEvent};

#[derive(Debug, Clone, Copy)]
pub struct MaxRecalculationHook;

impl HostHook for MaxRecalculationHook {
    fn name(&self) -> &'static str {
        "max_recalculation"
    }

    fn events(&self) -> &'static [HookEvent] {
        &[HookEvent::CreateItem, HookEvent::UpdateItem]
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        ctx.event.item().is_some_and(|item| item.is_class())
    }

    fn handle(&self, ctx: &HookContext<'_>) -> Result<HookOutput> {
        let (character, item, change) = match ctx.event {
            HostEvent::CreateItem { character, item } => (character, item, None),
            HostEvent::UpdateItem {
                character,
                item,
                change,
            } => (character, item, Some(change)),
            other => {
                return Err(RuntimeError::UnexpectedEvent {
                    hook: self.name(),
                    event: other.kind(),
                });
            }
        };

        let recalculation = recalculate_maximum(character, item, change, &ctx.rules());

        match &recalculation.outcome {
            RecalculationOutcome::Updated { max } => info!(
                target: "spellpoints::maximum",
                actor = %character.id,
                class = %item.name,
                max,
                "Pool maximum recalculated"
            ),
            RecalculationOutcome::Failed(error) => warn!(
                target: "spellpoints::maximum",
                actor = %character.id,
                error = %error,
                "Pool maximum left unchanged"
            ),
            outcome => debug!(
                target: "spellpoints::maximum",
                actor = %character.id,
                ?outcome,
                "No maximum written"
            ),
        }

        let effect = match recalculation.update {
            Some(update) => HookEffect::CommitUpdate(update),
            None => HookEffect::None,
        };
        Ok(HookOutput::new(effect, recalculation.notices))
    }
}
