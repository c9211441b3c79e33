//! Hook registry for dispatching host events.

use std::sync::Arc;

use spellpoints_core::{CastDialog, FormulaEvaluator, Notice, PendingUpdate, Settings, SheetToggle};
use tracing::{debug, error, trace};

use super::{HookContext, HookCriticality, HookEffect, HostHook};
use crate::error::{Result, RuntimeError};
use crate::event::HostEvent;

/// Everything the hooks produced for one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Pending update after all rewrites; set for pre-update events.
    pub update: Option<PendingUpdate>,
    /// Separate updates to commit, in hook order.
    pub commits: Vec<PendingUpdate>,
    pub dialog: Option<CastDialog>,
    pub sheet_toggle: Option<SheetToggle>,
    pub notices: Vec<Notice>,
}

/// Registry that runs hooks for host events.
///
/// Hooks are sorted by priority once at construction (lower values first);
/// hooks with equal priority keep their registration order.
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn HostHook>]>,
}

impl HookRegistry {
    pub fn new(mut hooks: Vec<Arc<dyn HostHook>>) -> Self {
        hooks.sort_by_key(|hook| hook.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Creates a registry with the built-in hooks.
    ///
    /// - CastSettlementHook: rewrites slot consumption into point debits
    /// - MaxRecalculationHook: refreshes the pool maximum on class changes
    /// - CastDialogHook: cost labels and warnings for the cast dialog
    /// - MixedModeSheetHook: per-character opt-in checkbox
    pub fn default_hooks() -> Self {
        use super::{CastDialogHook, CastSettlementHook, MaxRecalculationHook, MixedModeSheetHook};

        Self::new(vec![
            Arc::new(CastSettlementHook) as Arc<dyn HostHook>,
            Arc::new(MaxRecalculationHook) as Arc<dyn HostHook>,
            Arc::new(CastDialogHook) as Arc<dyn HostHook>,
            Arc::new(MixedModeSheetHook) as Arc<dyn HostHook>,
        ])
    }

    /// Runs every hook subscribed to the event's kind.
    ///
    /// # Error Handling
    ///
    /// Hook errors are handled based on criticality level:
    /// - `Critical`: returns the error immediately
    /// - `Important`: logs the error and continues with the next hook
    /// - `Optional`: logs at debug level and continues
    pub fn dispatch(
        &self,
        event: &HostEvent,
        settings: &Settings,
        evaluator: &dyn FormulaEvaluator,
    ) -> Result<Dispatch> {
        let kind = event.kind();
        let mut dispatch = Dispatch {
            update: match event {
                HostEvent::PreUpdateCharacter { update, .. } => Some(update.clone()),
                _ => None,
            },
            ..Dispatch::default()
        };

        for hook in self.hooks.iter().filter(|hook| hook.events().contains(&kind)) {
            let output = {
                let ctx = HookContext {
                    event,
                    pending: dispatch.update.as_ref(),
                    settings,
                    evaluator,
                };
                if !hook.should_trigger(&ctx) {
                    trace!(target: "spellpoints::hooks", hook = hook.name(), event = %kind, "Hook skipped");
                    continue;
                }
                hook.handle(&ctx)
            };

            let output = match output {
                Ok(output) => output,
                Err(error) => {
                    self.handle_hook_error(hook.as_ref(), error)?;
                    continue;
                }
            };

            debug!(
                target: "spellpoints::hooks",
                hook = hook.name(),
                event = %kind,
                notices = output.notices.len(),
                "Hook ran"
            );

            match output.effect {
                HookEffect::None => {}
                HookEffect::RewriteUpdate(update) => dispatch.update = Some(update),
                HookEffect::CommitUpdate(update) => dispatch.commits.push(update),
                HookEffect::Dialog(dialog) => dispatch.dialog = Some(dialog),
                HookEffect::SheetToggle(toggle) => dispatch.sheet_toggle = Some(toggle),
            }
            dispatch.notices.extend(output.notices);
        }

        Ok(dispatch)
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|hook| (hook.name(), hook.priority()))
    }

    /// Returns Ok(()) for Important/Optional hooks, Err for Critical hooks.
    fn handle_hook_error(&self, hook: &dyn HostHook, error: RuntimeError) -> Result<()> {
        let criticality = hook.criticality();

        match criticality {
            HookCriticality::Critical => {
                error!(
                    target: "spellpoints::hooks",
                    hook = hook.name(),
                    criticality = criticality.as_str(),
                    error = %error,
                    "Critical hook failed, aborting dispatch"
                );
                return Err(error);
            }
            HookCriticality::Important => error!(
                target: "spellpoints::hooks",
                hook = hook.name(),
                criticality = criticality.as_str(),
                error = %error,
                "Hook failed, continuing"
            ),
            HookCriticality::Optional => debug!(
                target: "spellpoints::hooks",
                hook = hook.name(),
                criticality = criticality.as_str(),
                error = %error,
                "Optional hook failed"
            ),
        }

        Ok(())
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::HookEvent;
    use crate::hooks::HookOutput;
    use spellpoints_core::{CharacterKind, CharacterRecord, ExpressionEvaluator};

    struct Failing(HookCriticality);

    impl HostHook for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn events(&self) -> &'static [HookEvent] {
            &[HookEvent::RenderActorSheet]
        }

        fn criticality(&self) -> HookCriticality {
            self.0
        }

        fn handle(&self, _ctx: &HookContext<'_>) -> Result<HookOutput> {
            Err(RuntimeError::UnexpectedEvent {
                hook: self.name(),
                event: HookEvent::RenderActorSheet,
            })
        }
    }

    struct Rewrite(i32, i64);

    impl HostHook for Rewrite {
        fn name(&self) -> &'static str {
            "rewrite"
        }

        fn events(&self) -> &'static [HookEvent] {
            &[HookEvent::PreUpdateCharacter]
        }

        fn priority(&self) -> i32 {
            self.0
        }

        fn handle(&self, ctx: &HookContext<'_>) -> Result<HookOutput> {
            let mut update = ctx.pending.cloned().unwrap_or_default();
            let current = update
                .resource("primary")
                .and_then(|patch| patch.value)
                .unwrap_or(0);
            update.set_resource_value("primary", current * 10 + self.1);
            Ok(HookOutput::new(HookEffect::RewriteUpdate(update), Vec::new()))
        }
    }

    fn sheet_event() -> HostEvent {
        HostEvent::RenderActorSheet {
            character: CharacterRecord::new("a1", "Elora", CharacterKind::Pc),
        }
    }

    #[test]
    fn critical_failure_aborts_dispatch() {
        let registry = HookRegistry::new(vec![Arc::new(Failing(HookCriticality::Critical))]);
        let result = registry.dispatch(&sheet_event(), &Settings::new(), &ExpressionEvaluator);
        assert!(matches!(result, Err(RuntimeError::UnexpectedEvent { .. })));
    }

    #[test]
    fn important_and_optional_failures_continue() {
        for criticality in [HookCriticality::Important, HookCriticality::Optional] {
            let registry = HookRegistry::new(vec![Arc::new(Failing(criticality))]);
            let result = registry.dispatch(&sheet_event(), &Settings::new(), &ExpressionEvaluator);
            assert!(result.is_ok());
        }
    }

    #[test]
    fn rewrites_chain_in_priority_order() {
        let registry = HookRegistry::new(vec![
            Arc::new(Rewrite(5, 2)) as Arc<dyn HostHook>,
            Arc::new(Rewrite(-5, 1)) as Arc<dyn HostHook>,
        ]);
        let event = HostEvent::PreUpdateCharacter {
            character: CharacterRecord::new("a1", "Elora", CharacterKind::Pc),
            update: PendingUpdate::new(),
        };

        let dispatch = registry
            .dispatch(&event, &Settings::new(), &ExpressionEvaluator)
            .unwrap();

        let value = dispatch.update.unwrap().resource("primary").unwrap().value;
        assert_eq!(value, Some(12));
        assert_eq!(registry.hooks().map(|(_, p)| p).collect::<Vec<_>>(), vec![-5, 5]);
    }

    #[test]
    fn unsubscribed_hooks_do_not_run() {
        let registry = HookRegistry::new(vec![Arc::new(Failing(HookCriticality::Critical))]);
        let event = HostEvent::PreUpdateCharacter {
            character: CharacterRecord::new("a1", "Elora", CharacterKind::Pc),
            update: PendingUpdate::new(),
        };

        assert!(registry.dispatch(&event, &Settings::new(), &ExpressionEvaluator).is_ok());
    }
}
