//! Host lifecycle events the runtime reacts to.

use std::fmt;

use spellpoints_core::{CharacterRecord, ItemChange, ItemRecord, PendingUpdate};

/// Kind of a host event; hooks subscribe to these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookEvent {
    PreUpdateCharacter,
    CreateItem,
    UpdateItem,
    RenderAbilityUseDialog,
    RenderActorSheet,
}

impl HookEvent {
    pub const ALL: [HookEvent; 5] = [
        Self::PreUpdateCharacter,
        Self::CreateItem,
        Self::UpdateItem,
        Self::RenderAbilityUseDialog,
        Self::RenderActorSheet,
    ];

    /// Host hook name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PreUpdateCharacter => "preUpdateActor",
            Self::CreateItem => "createItem",
            Self::UpdateItem => "updateItem",
            Self::RenderAbilityUseDialog => "renderAbilityUseDialog",
            Self::RenderActorSheet => "renderActorSheet5e",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host event with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Character update proposed but not yet committed.
    PreUpdateCharacter {
        character: CharacterRecord,
        update: PendingUpdate,
    },
    CreateItem {
        character: CharacterRecord,
        item: ItemRecord,
    },
    UpdateItem {
        character: CharacterRecord,
        item: ItemRecord,
        change: ItemChange,
    },
    RenderAbilityUseDialog {
        character: CharacterRecord,
        item: ItemRecord,
    },
    RenderActorSheet {
        character: CharacterRecord,
    },
}

impl HostEvent {
    pub const fn kind(&self) -> HookEvent {
        match self {
            Self::PreUpdateCharacter { .. } => HookEvent::PreUpdateCharacter,
            Self::CreateItem { .. } => HookEvent::CreateItem,
            Self::UpdateItem { .. } => HookEvent::UpdateItem,
            Self::RenderAbilityUseDialog { .. } => HookEvent::RenderAbilityUseDialog,
            Self::RenderActorSheet { .. } => HookEvent::RenderActorSheet,
        }
    }

    /// Character the event concerns (the item owner for item events).
    pub const fn character(&self) -> &CharacterRecord {
        match self {
            Self::PreUpdateCharacter { character, .. }
            | Self::CreateItem { character, .. }
            | Self::UpdateItem { character, .. }
            | Self::RenderAbilityUseDialog { character, .. }
            | Self::RenderActorSheet { character } => character,
        }
    }

    pub const fn item(&self) -> Option<&ItemRecord> {
        match self {
            Self::CreateItem { item, .. }
            | Self::UpdateItem { item, .. }
            | Self::RenderAbilityUseDialog { item, .. } => Some(item),
            Self::PreUpdateCharacter { .. } | Self::RenderActorSheet { .. } => None,
        }
    }
}
