use thiserror::Error;
use uuid::Uuid;

use crate::mode::SafetyMode;

/// Unified error type for the entire Warden governor.
#[derive(Error, Debug)]
pub enum WardenError {
    // ── Override request errors ────────────────────────────────
    #[error("invalid override request: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("actor '{actor}' is not authorized to {action}")]
    Authorization { actor: String, action: String },

    #[error("override not found: {0}")]
    OverrideNotFound(Uuid),

    // ── Mode state machine errors ──────────────────────────────
    #[error("invalid transition from {from} to {to}: {reason}")]
    Transition {
        from: SafetyMode,
        to: SafetyMode,
        reason: String,
    },

    // ── Lifecycle errors ───────────────────────────────────────
    #[error("invalid state: {0}")]
    State(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WardenError>;
