//! Host event hooks.
//!
//! Each hook subscribes to one or more [`HookEvent`]s and turns the event into
//! a [`HookOutput`]: an effect for the host plus notices for the acting user.
//! Hooks call into the pure rules of `spellpoints-core`; they never touch
//! host state themselves.
//!
//! # Architecture
//!
//! - Hooks are registered with the [`HookRegistry`] and sorted by priority
//! - For every event, subscribed hooks run in priority order
//! - A hook that rewrites the pending update hands the rewritten update to the
//!   next hook
//! - Failures are handled according to [`HookCriticality`]

mod cast;
mod context;
mod dialog;
mod recalculate;
mod registry;
mod sheet;

pub use cast::CastSettlementHook;
pub use context::HookContext;
pub use dialog::CastDialogHook;
pub use recalculate::MaxRecalculationHook;
pub use registry::{Dispatch, HookRegistry};
pub use sheet::MixedModeSheetHook;

use spellpoints_core::{CastDialog, Notice, PendingUpdate, SheetToggle};

use crate::error::Result;
use crate::event::HookEvent;

/// Defines the criticality level of a hook for error handling.
///
/// - Critical hooks must succeed or the whole dispatch fails
/// - Important hooks log errors but allow continuation
/// - Optional hooks can fail silently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCriticality {
    /// Hook failure fails the dispatch.
    ///
    /// Use for hooks that decide what the host commits (e.g. cast settlement).
    Critical,

    /// Hook failure is logged as an error; remaining hooks still run.
    Important,

    /// Hook failure is logged at debug level.
    ///
    /// Use for cosmetic hooks (e.g. the sheet checkbox).
    Optional,
}

impl HookCriticality {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Optional => "optional",
        }
    }
}

/// What a hook asks the host to do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HookEffect {
    #[default]
    None,
    /// Replace the pending update of a pre-update event.
    RewriteUpdate(PendingUpdate),
    /// Commit a separate update on the character.
    CommitUpdate(PendingUpdate),
    /// Decorate the cast dialog.
    Dialog(CastDialog),
    /// Render the mixed-mode checkbox.
    SheetToggle(SheetToggle),
}

/// Result of running one hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HookOutput {
    pub effect: HookEffect,
    pub notices: Vec<Notice>,
}

impl HookOutput {
    pub fn new(effect: HookEffect, notices: Vec<Notice>) -> Self {
        Self { effect, notices }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Reaction to host lifecycle events.
pub trait HostHook: Send + Sync {
    /// Human-readable name used in logging.
    fn name(&self) -> &'static str;

    /// Events this hook subscribes to.
    fn events(&self) -> &'static [HookEvent];

    /// Execution priority; lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    /// Cheap pre-check run before [`HostHook::handle`].
    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        let _ = ctx;
        true
    }

    fn handle(&self, ctx: &HookContext<'_>) -> Result<HookOutput>;
}
