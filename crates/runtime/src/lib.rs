//! Host integration for the spell point rules.
//!
//! This crate wires the pure rules of `spellpoints-core` into a host's event
//! lifecycle. Hosts embed [`SpellPointsRuntime`], forward their lifecycle
//! events to it and commit whatever it answers with.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the facade and builder
//! - [`event`] names the host events the rules react to
//! - [`hooks`] maps each event onto the rules, ordered by priority
//! - [`settings`] persists module settings as host JSON values
//! - [`notify`] renders notices for the host's chat and notifications
//! - [`config`] resolves file locations from the environment
pub mod config;
pub mod error;
pub mod event;
pub mod hooks;
pub mod notify;
pub mod runtime;
pub mod settings;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use event::{HookEvent, HostEvent};
pub use hooks::{
    CastDialogHook, CastSettlementHook, Dispatch, HookContext, HookCriticality, HookEffect,
    HookOutput, HookRegistry, HostHook, MaxRecalculationHook, MixedModeSheetHook,
};
pub use notify::{
    Localizer, NotificationSink, RecordingSink, SinkEntry, TracingSink, chat_html, deliver,
};
pub use runtime::{DialogView, SpellPointsRuntime, SpellPointsRuntimeBuilder};
pub use settings::{
    ENABLED_KEY, FileSettingsStore, InMemorySettingsStore, SETTINGS_KEY, SettingsStore,
    load_settings, store_settings,
};
