//! Spell point rules for D&D 5e character sheets.
//!
//! `spellpoints-core` replaces spell slot consumption with a pooled point
//! resource. It defines the settings model, the character snapshot and the
//! typed updates proposed against it, and pure rule functions that turn a
//! proposed update into a settled one. Nothing here performs I/O: the host
//! commits every [`PendingUpdate`] and delivers every [`Notice`].

pub mod config;
pub mod error;
pub mod form;
pub mod formula;
pub mod notice;
pub mod rules;
pub mod state;

pub use config::{
    FormulaPreset, MAX_CLASS_LEVEL, MAX_SLOT_LEVEL, MODULE_NAME, PresetOverrides, Settings,
};
pub use error::{ErrorSeverity, SpellPointError};
pub use form::{FieldError, SettingsForm};
pub use formula::{
    Bindings, ExpressionEvaluator, FormulaError, FormulaEvaluator, evaluate_finite,
    evaluate_points,
};
pub use notice::{Delivery, Message, Notice, NoticeLevel};
pub use rules::{
    CastConfirmation, CastDialog, CastEvent, DialogWarning, GateDecision, LevelCost,
    LevelOverride, PassReason, Recalculation, RecalculationOutcome, RuleContext, RuleError,
    Settlement, SettlementOutcome, SheetToggle, SkipReason, VetoReason, assess_cast_dialog,
    compute_maximum, confirm_cast, cost_for_tier, cost_to_cast, gate, locate, max_custom,
    max_fixed, recalculate_maximum, set_opt_in, settle_cast, sheet_toggle,
};
pub use state::{
    AbilityScore, Attributes, CharacterFlags, CharacterKind, CharacterRecord, ClassEntry,
    DeathSavePatch, DeathSaves, HitPoints, HpPatch, ItemChange, ItemKind, ItemRecord,
    PendingUpdate, Progression, ResourcePatch, ResourceSlot, SlotPatch, SpellSlot, SpellSlots,
    SpellTier, UpdateFields,
};
