use spellpoints_core::assess_cast_dialog;

use super::{HookContext, HookEffect, HookOutput, HostHook};
use crate::error::{Result, RuntimeError};
use crate::event::{HookEvent, HostEvent};

/// Adds point costs and warnings to the cast dialog of spells.
#[derive(Debug, Clone, Copy)]
pub struct CastDialogHook;

impl HostHook for CastDialogHook {
    fn name(&self) -> &'static str {
        "cast_dialog"
    }

    fn events(&self) -> &'static [HookEvent] {
        &[HookEvent::RenderAbilityUseDialog]
    }

    fn priority(&self) -> i32 {
        10
    }

    fn handle(&self, ctx: &HookContext<'_>) -> Result<HookOutput> {
        let HostEvent::RenderAbilityUseDialog { character, item } = ctx.event else {
            return Err(RuntimeError::UnexpectedEvent {
                hook: self.name(),
                event: ctx.event.kind(),
            });
        };

        Ok(match assess_cast_dialog(character, item, &ctx.rules()) {
            Some(dialog) => HookOutput::new(HookEffect::Dialog(dialog), Vec::new()),
            None => HookOutput::none(),
        })
    }
}
