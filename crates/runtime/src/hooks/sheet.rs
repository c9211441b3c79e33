use spellpoints_core::sheet_toggle;

use super::{HookContext, HookCriticality, HookEffect, HookOutput, HostHook};
use crate::error::Result;
use crate::event::HookEvent;

/// Shows the mixed-mode opt-in checkbox on character sheets.
#[derive(Debug, Clone, Copy)]
pub struct MixedModeSheetHook;

impl HostHook for MixedModeSheetHook {
    fn name(&self) -> &'static str {
        "mixed_mode_sheet"
    }

    fn events(&self) -> &'static [HookEvent] {
        &[HookEvent::RenderActorSheet]
    }

    fn priority(&self) -> i32 {
        20
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Optional
    }

    fn handle(&self, ctx: &HookContext<'_>) -> Result<HookOutput> {
        let toggle = sheet_toggle(ctx.event.character(), ctx.settings);
        Ok(HookOutput::new(
            toggle.map_or(HookEffect::None, HookEffect::SheetToggle),
            Vec::new(),
        ))
    }
}
