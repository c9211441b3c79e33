//! Spell point rules.
//!
//! Each rule is a pure function of a character snapshot, the active
//! [`Settings`] and a [`FormulaEvaluator`]:
//!
//! - [`locate`]: find the pool resource on a character
//! - [`cost_to_cast`]: point cost of a slot level
//! - [`compute_maximum`]: pool capacity from classes or custom formulas
//! - [`settle_cast`]: rewrite a slot-consuming update into a point debit
//! - [`recalculate_maximum`]: refresh the pool maximum after a class change
//! - [`assess_cast_dialog`] / [`confirm_cast`]: cast dialog labels and checks
//! - [`sheet_toggle`]: mixed-mode opt-in checkbox
//!
//! Entry points driven by host events ([`settle_cast`],
//! [`recalculate_maximum`], the dialog functions) never fail. They return an
//! outcome plus the notices to show; lower-level calculators return
//! [`RuleError`].

mod cost;
mod dialog;
mod gate;
mod locator;
mod maximum;
mod recalculate;
mod settlement;
mod sheet;

pub use cost::{cost_for_tier, cost_to_cast};
pub use dialog::{CastConfirmation, CastDialog, DialogWarning, LevelCost, assess_cast_dialog, confirm_cast};
pub use gate::{GateDecision, gate};
pub use locator::locate;
pub use maximum::{LevelOverride, compute_maximum, max_custom, max_fixed};
pub use recalculate::{Recalculation, RecalculationOutcome, SkipReason, recalculate_maximum};
pub use settlement::{CastEvent, PassReason, Settlement, SettlementOutcome, VetoReason, settle_cast};
pub use sheet::{SheetToggle, set_opt_in, sheet_toggle};

use crate::config::Settings;
use crate::error::{ErrorSeverity, SpellPointError};
use crate::formula::{FormulaError, FormulaEvaluator};

/// Inputs shared by every rule invocation.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub settings: &'a Settings,
    pub evaluator: &'a dyn FormulaEvaluator,
}

impl<'a> RuleContext<'a> {
    pub fn new(settings: &'a Settings, evaluator: &'a dyn FormulaEvaluator) -> Self {
        Self {
            settings,
            evaluator,
        }
    }
}

impl std::fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("settings", self.settings)
            .finish_non_exhaustive()
    }
}

/// Errors raised by the calculators.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// No resource slot is labelled with the configured pool name.
    #[error("no resource labelled `{resource}` on character")]
    ResourceNotFound { resource: String },

    /// Cost table has no formula for the slot level.
    #[error("no cost configured for slot level {level}")]
    MissingCostEntry { level: u8 },

    /// Points table has no entry for the caster level.
    #[error("no points configured for caster level {level}")]
    MissingPointsEntry { level: u32 },

    /// Pact slot used while the character's pact level is unknown.
    #[error("pact slot level is not set")]
    PactLevelUnset,

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

impl SpellPointError for RuleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ResourceNotFound { .. } => ErrorSeverity::Recoverable,
            Self::MissingCostEntry { .. } | Self::MissingPointsEntry { .. } => {
                ErrorSeverity::Validation
            }
            Self::PactLevelUnset => ErrorSeverity::Internal,
            Self::Formula(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ResourceNotFound { .. } => "RULE_RESOURCE_NOT_FOUND",
            Self::MissingCostEntry { .. } => "RULE_MISSING_COST_ENTRY",
            Self::MissingPointsEntry { .. } => "RULE_MISSING_POINTS_ENTRY",
            Self::PactLevelUnset => "RULE_PACT_LEVEL_UNSET",
            Self::Formula(error) => error.error_code(),
        }
    }
}
