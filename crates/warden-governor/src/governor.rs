use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use warden_config::ConfigStore;
use warden_core::{AuditEvent, AuditSink, Result, SafetyMode, WardenError};

use crate::plan::TransitionPlan;
use crate::recommend::{ModeRecommendation, SafetyMetrics, recommend};

/// Immutable, append-only record of one mode change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeTransition {
    pub from: SafetyMode,
    pub to: SafetyMode,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub reason: String,
    pub auto: bool,
}

/// Enforces the mode state machine over the config store.
pub struct ModeGovernor {
    store: ConfigStore,
    log: Mutex<Vec<ModeTransition>>,
    audit: Arc<dyn AuditSink>,
}

impl ModeGovernor {
    pub fn new(store: ConfigStore, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            log: Mutex::new(Vec::new()),
            audit,
        }
    }

    pub fn current_mode(&self) -> SafetyMode {
        self.store.mode()
    }

    /// Tightening (target <= current) is always permitted. Relaxing is
    /// permitted one step at a time only.
    fn validate_transition(from: SafetyMode, to: SafetyMode) -> Result<()> {
        if from.is_tightening_to(to) {
            return Ok(());
        }
        match from.next_relaxed() {
            Some(next) if to == next => Ok(()),
            Some(next) => Err(WardenError::Transition {
                from,
                to,
                reason: format!("cannot jump from {from} to {to} - must transition through {next} first"),
            }),
            // Unreachable in practice: Off has no relaxing target above it.
            None => Err(WardenError::Transition {
                from,
                to,
                reason: "already at minimum safety".into(),
            }),
        }
    }

    /// Validated transition. Rewrites the config atomically, appends to the
    /// transition log, and emits the new mode's operator guidance.
    pub fn transition_to(&self, to: SafetyMode, actor: &str, reason: &str) -> Result<()> {
        let from = self.store.mode();
        Self::validate_transition(from, to)?;
        self.execute(from, to, actor, reason, false);
        Ok(())
    }

    /// Unconditional jump to Strict from any mode. Never blocked.
    pub fn emergency_revert(&self, reason: &str) {
        let from = self.store.mode();
        self.execute(
            from,
            SafetyMode::Strict,
            "emergency-system",
            &format!("Emergency revert: {reason}"),
            false,
        );
    }

    /// Recommendation for the current mode; pure in (mode, metrics).
    pub fn recommendation(&self, metrics: &SafetyMetrics) -> ModeRecommendation {
        recommend(self.store.mode(), metrics)
    }

    /// Scheduler entry point. Executes the recommended transition only when
    /// it tightens (recommended < current) with confidence >= 0.8 — automatic
    /// relaxation is never performed.
    pub fn auto_transition_check(&self, metrics: &SafetyMetrics) -> ModeRecommendation {
        let rec = self.recommendation(metrics);
        if rec.recommended_mode < rec.current_mode && rec.confidence >= 0.8 {
            self.execute(
                rec.current_mode,
                rec.recommended_mode,
                "system",
                &format!("Auto-transition due to: {}", rec.reason),
                true,
            );
        }
        rec
    }

    pub fn transition_history(&self) -> Vec<ModeTransition> {
        self.log.lock().clone()
    }

    /// Staged plan for gradually relaxing safety from the current mode.
    pub fn transition_plan(&self) -> TransitionPlan {
        TransitionPlan::for_mode(self.store.mode())
    }

    fn execute(&self, from: SafetyMode, to: SafetyMode, actor: &str, reason: &str, auto: bool) {
        self.store.update_mode(to, actor);
        self.log.lock().push(ModeTransition {
            from,
            to,
            timestamp: Utc::now(),
            actor: actor.to_string(),
            reason: reason.to_string(),
            auto,
        });
        self.audit.record(AuditEvent::ModeChanged {
            from,
            to,
            actor: actor.to_string(),
            reason: reason.to_string(),
            auto,
        });
        info!(%from, %to, actor, auto, reason, "safety mode transition");
        info!(mode = %to, guidance = to.guidance(), "mode guidance");
    }
}
