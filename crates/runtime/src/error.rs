//! Errors raised by the runtime.
//!
//! Host-facing entry points of [`SpellPointsRuntime`](crate::SpellPointsRuntime)
//! never return these: they log and fall back to a safe answer. Errors surface
//! from settings management and from the building blocks used directly.

use spellpoints_core::{ErrorSeverity, FieldError, SpellPointError};

use crate::event::HookEvent;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("settings store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {}", describe(.0))]
    InvalidSettings(Vec<FieldError>),

    #[error("hook `{hook}` cannot handle {event} events")]
    UnexpectedEvent {
        hook: &'static str,
        event: HookEvent,
    },
}

impl SpellPointError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidSettings(_) => ErrorSeverity::Validation,
            Self::Io(_) | Self::Json(_) => ErrorSeverity::Recoverable,
            Self::UnexpectedEvent { .. } => ErrorSeverity::Internal,
            Self::LockPoisoned => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "RUNTIME_LOCK_POISONED",
            Self::Io(_) => "RUNTIME_IO",
            Self::Json(_) => "RUNTIME_JSON",
            Self::InvalidSettings(_) => "RUNTIME_INVALID_SETTINGS",
            Self::UnexpectedEvent { .. } => "RUNTIME_UNEXPECTED_EVENT",
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
