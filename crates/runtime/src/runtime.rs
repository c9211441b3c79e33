//! Spell point runtime facade.
//!
//! [`SpellPointsRuntime`] is what a host integration talks to. It owns the
//! settings snapshot, the hook registry and the notification plumbing, and
//! turns each host lifecycle call into a hook dispatch. Every host-facing
//! method answers with something the host can use as-is; failures are logged
//! and never cross the host boundary.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use spellpoints_core::{
    CastConfirmation, CastDialog, CharacterRecord, ExpressionEvaluator, FormulaEvaluator,
    ItemChange, ItemRecord, LevelCost, MODULE_NAME, PendingUpdate, RuleContext, Settings,
    SettingsForm, SheetToggle, confirm_cast, set_opt_in,
};
use tracing::{error, info};

use crate::error::{Result, RuntimeError};
use crate::event::HostEvent;
use crate::hooks::{Dispatch, HookRegistry};
use crate::notify::{Localizer, NotificationSink, TracingSink, deliver};
use crate::settings::{InMemorySettingsStore, SettingsStore, load_settings, store_settings};

/// Cast dialog decorations, rendered for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogView {
    /// Level options with their cost label.
    pub options: Vec<(LevelCost, String)>,
    /// Warnings to append below the form.
    pub warnings: Vec<String>,
}

pub struct SpellPointsRuntime {
    store: Arc<dyn SettingsStore>,
    settings: RwLock<Settings>,
    evaluator: Arc<dyn FormulaEvaluator + Send + Sync>,
    hooks: HookRegistry,
    sink: Arc<dyn NotificationSink>,
    localizer: Localizer,
}

impl SpellPointsRuntime {
    pub fn builder() -> SpellPointsRuntimeBuilder {
        SpellPointsRuntimeBuilder::new()
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Current settings snapshot.
    pub fn settings(&self) -> Result<Settings> {
        self.settings
            .read()
            .map(|settings| settings.clone())
            .map_err(|_| RuntimeError::LockPoisoned)
    }

    /// Reloads the snapshot from the store.
    pub fn reload_settings(&self) -> Result<Settings> {
        let loaded = load_settings(self.store.as_ref())?;
        let mut settings = self
            .settings
            .write()
            .map_err(|_| RuntimeError::LockPoisoned)?;
        *settings = loaded.clone();

        info!(
            target: "spellpoints::settings",
            enabled = loaded.enabled,
            preset = %loaded.preset,
            custom = loaded.is_custom_formula,
            "Settings loaded"
        );
        Ok(loaded)
    }

    /// Writes one raw setting under the module namespace and reloads.
    pub fn set_setting(&self, key: &str, value: Value) -> Result<Settings> {
        self.store.set(MODULE_NAME, key, value)?;
        self.reload_settings()
    }

    /// Persists `settings` and reloads.
    pub fn save_settings(&self, settings: &Settings) -> Result<Settings> {
        store_settings(self.store.as_ref(), settings)?;
        self.reload_settings()
    }

    pub fn open_settings_form(&self) -> Result<SettingsForm> {
        Ok(SettingsForm::open(&self.settings()?))
    }

    /// Validates and stores a submitted form.
    pub fn submit_settings_form(&self, form: SettingsForm) -> Result<Settings> {
        let settings = form
            .submit(self.evaluator.as_ref())
            .map_err(RuntimeError::InvalidSettings)?;
        self.save_settings(&settings)
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Settles a proposed character update.
    ///
    /// Returns the update to commit. If settlement fails outright the cast is
    /// vetoed with an empty update.
    pub fn pre_update_character(
        &self,
        character: &CharacterRecord,
        update: PendingUpdate,
    ) -> PendingUpdate {
        let event = HostEvent::PreUpdateCharacter {
            character: character.clone(),
            update,
        };

        match self.dispatch(&event) {
            Some(dispatch) => dispatch.update.unwrap_or_default(),
            None => PendingUpdate::new(),
        }
    }

    /// Reacts to a new item; returns an update to commit, if any.
    pub fn item_created(
        &self,
        character: &CharacterRecord,
        item: &ItemRecord,
    ) -> Option<PendingUpdate> {
        let event = HostEvent::CreateItem {
            character: character.clone(),
            item: item.clone(),
        };
        self.dispatch(&event).and_then(merge_commits)
    }

    /// Reacts to a proposed item change; returns an update to commit, if any.
    pub fn item_updated(
        &self,
        character: &CharacterRecord,
        item: &ItemRecord,
        change: &ItemChange,
    ) -> Option<PendingUpdate> {
        let event = HostEvent::UpdateItem {
            character: character.clone(),
            item: item.clone(),
            change: change.clone(),
        };
        self.dispatch(&event).and_then(merge_commits)
    }

    /// Cost labels and warnings for a spell's cast dialog.
    pub fn render_ability_use_dialog(
        &self,
        character: &CharacterRecord,
        item: &ItemRecord,
    ) -> Option<DialogView> {
        let event = HostEvent::RenderAbilityUseDialog {
            character: character.clone(),
            item: item.clone(),
        };
        let dialog = self.dispatch(&event)?.dialog?;
        let resource = self.settings().ok()?.resource_name;
        Some(self.render_dialog(dialog, &resource))
    }

    /// Whether the cast may go ahead once the dialog is confirmed.
    pub fn confirm_ability_use(
        &self,
        character: &CharacterRecord,
        item: &ItemRecord,
        selected_level: u8,
        consume_slot: bool,
    ) -> bool {
        let Ok(settings) = self.settings() else {
            error!(target: "spellpoints::runtime", "Settings unavailable, allowing cast");
            return true;
        };
        let ctx = RuleContext::new(&settings, self.evaluator.as_ref());

        match confirm_cast(character, item, selected_level, consume_slot, &ctx) {
            CastConfirmation::Proceed => true,
            CastConfirmation::Block(notice) => {
                info!(
                    target: "spellpoints::cast",
                    actor = %character.id,
                    level = selected_level,
                    "Cast blocked in dialog"
                );
                deliver(&[notice], &self.localizer, self.sink.as_ref());
                false
            }
        }
    }

    /// Mixed-mode checkbox for a character sheet.
    pub fn render_actor_sheet(&self, character: &CharacterRecord) -> Option<SheetToggle> {
        let event = HostEvent::RenderActorSheet {
            character: character.clone(),
        };
        self.dispatch(&event)?.sheet_toggle
    }

    /// Update storing a character's mixed-mode opt-in.
    pub fn toggle_opt_in(&self, enabled: bool) -> PendingUpdate {
        set_opt_in(enabled)
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Evaluator used for every formula, for callers running rules directly.
    pub fn evaluator(&self) -> &(dyn FormulaEvaluator + Send + Sync) {
        self.evaluator.as_ref()
    }

    fn dispatch(&self, event: &HostEvent) -> Option<Dispatch> {
        let settings = match self.settings() {
            Ok(settings) => settings,
            Err(error) => {
                error!(target: "spellpoints::runtime", error = %error, event = %event.kind(), "Settings unavailable");
                return None;
            }
        };

        match self.hooks.dispatch(event, &settings, self.evaluator.as_ref()) {
            Ok(dispatch) => {
                deliver(&dispatch.notices, &self.localizer, self.sink.as_ref());
                Some(dispatch)
            }
            Err(error) => {
                error!(
                    target: "spellpoints::runtime",
                    error = %error,
                    event = %event.kind(),
                    actor = %event.character().id,
                    "Dispatch failed"
                );
                None
            }
        }
    }

    fn render_dialog(&self, dialog: CastDialog, resource: &str) -> DialogView {
        DialogView {
            options: dialog
                .options
                .into_iter()
                .map(|option| {
                    let label = self.localizer.render(&option.label(resource));
                    (option, label)
                })
                .collect(),
            warnings: dialog
                .warnings
                .iter()
                .map(|warning| self.localizer.render(&warning.message(resource)))
                .collect(),
        }
    }
}

/// Folds the separate updates of a dispatch into one.
fn merge_commits(dispatch: Dispatch) -> Option<PendingUpdate> {
    dispatch.commits.into_iter().reduce(|mut merged, update| {
        merged.slot_change.extend(update.slot_change);
        merged.resource_change.extend(update.resource_change);
        merged.hp_change = update.hp_change.or(merged.hp_change);
        merged.death_save_change = update.death_save_change.or(merged.death_save_change);
        merged.opt_in_change = update.opt_in_change.or(merged.opt_in_change);
        merged
    })
}

/// Builder for [`SpellPointsRuntime`].
///
/// Defaults: in-memory settings store, [`ExpressionEvaluator`], built-in
/// hooks, [`TracingSink`] and English messages.
pub struct SpellPointsRuntimeBuilder {
    store: Option<Arc<dyn SettingsStore>>,
    evaluator: Option<Arc<dyn FormulaEvaluator + Send + Sync>>,
    hooks: Option<HookRegistry>,
    sink: Option<Arc<dyn NotificationSink>>,
    localizer: Option<Localizer>,
}

impl SpellPointsRuntimeBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            evaluator: None,
            hooks: None,
            sink: None,
            localizer: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn evaluator(mut self, evaluator: Arc<dyn FormulaEvaluator + Send + Sync>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn localizer(mut self, localizer: Localizer) -> Self {
        self.localizer = Some(localizer);
        self
    }

    /// Builds the runtime and loads the initial settings snapshot.
    pub fn build(self) -> Result<SpellPointsRuntime> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemorySettingsStore::new()));
        let settings = load_settings(store.as_ref())?;

        Ok(SpellPointsRuntime {
            store,
            settings: RwLock::new(settings),
            evaluator: self
                .evaluator
                .unwrap_or_else(|| Arc::new(ExpressionEvaluator)),
            hooks: self.hooks.unwrap_or_default(),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
            localizer: self.localizer.unwrap_or_default(),
        })
    }
}

impl Default for SpellPointsRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
