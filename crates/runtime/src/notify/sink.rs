use std::sync::{Mutex, PoisonError};

use spellpoints_core::NoticeLevel;
use tracing::{info, warn};

use super::NotificationSink;

/// Sink that writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => info!(target: "spellpoints::notify", "{message}"),
            NoticeLevel::Error => warn!(target: "spellpoints::notify", "{message}"),
        }
    }

    fn post_chat_message(&self, html: &str, speaker: &str) {
        info!(target: "spellpoints::chat", speaker, "{html}");
    }
}

/// What a [`RecordingSink`] received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEntry {
    Notify { level: NoticeLevel, message: String },
    Chat { html: String, speaker: String },
}

/// Sink that keeps every delivery in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<SinkEntry>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<SinkEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, entry: SinkEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.push(SinkEntry::Notify {
            level,
            message: message.to_owned(),
        });
    }

    fn post_chat_message(&self, html: &str, speaker: &str) {
        self.push(SinkEntry::Chat {
            html: html.to_owned(),
            speaker: speaker.to_owned(),
        });
    }
}
