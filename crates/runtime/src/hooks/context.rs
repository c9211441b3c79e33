//! Execution context provided to hooks.

use spellpoints_core::{FormulaEvaluator, PendingUpdate, RuleContext, Settings};

use crate::event::HostEvent;

/// Read-only view of one dispatch, handed to every hook.
///
/// `pending` is the update as rewritten by the hooks that ran before; it is
/// only set for pre-update events.
pub struct HookContext<'a> {
    pub event: &'a HostEvent,
    pub pending: Option<&'a PendingUpdate>,
    pub settings: &'a Settings,
    pub evaluator: &'a dyn FormulaEvaluator,
}

impl<'a> HookContext<'a> {
    pub fn rules(&self) -> RuleContext<'a> {
        RuleContext::new(self.settings, self.evaluator)
    }
}
