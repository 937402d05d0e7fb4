use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::mode::SafetyMode;

/// Audit events emitted for every transition, override, and emergency action.
/// Persistence format is the sink's concern, not ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    // ── Mode lifecycle ─────────────────────────────────────────
    ModeChanged {
        from: SafetyMode,
        to: SafetyMode,
        actor: String,
        reason: String,
        auto: bool,
    },
    SafetyEnabled {
        actor: String,
    },
    SafetyDisabled {
        actor: String,
        reason: String,
    },
    ConfigImported {
        actor: String,
    },

    // ── Override lifecycle ─────────────────────────────────────
    OverrideCreated {
        id: Uuid,
        scope: String,
        actor: String,
        expires_at: DateTime<Utc>,
    },
    OverrideExpired {
        id: Uuid,
    },
    OverrideRevoked {
        id: Uuid,
        actor: String,
        reason: String,
    },

    // ── Emergency lifecycle ────────────────────────────────────
    EmergencyActivated {
        actor: String,
        level: String,
        reason: String,
    },
    EmergencyDeactivated {
        actor: String,
        reason: String,
    },
}

/// Abstract sink consumed from the logging/audit collaborator.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Default sink: structured tracing events, nothing persisted.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, event: AuditEvent) {
        info!(?event, "audit");
    }
}

/// In-memory sink for tests and embedding hosts that drain events themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<AuditEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AuditSink for MemorySink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}
