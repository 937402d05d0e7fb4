//! # warden-runtime
//!
//! The assembled safety governor, constructed once at startup and passed by
//! reference to consumers. The external automation dispatcher asks three
//! questions before sending — is the target classifiable, does the mode
//! allow it, does an emergency change the answer — and all three must be
//! favorable to proceed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use warden_config::{ConfigStore, SafetyConfig, SafetyStats};
use warden_core::{AuditSink, Result, RiskLevel, SafetyMode, TracingSink};
use warden_governor::{ModeGovernor, ModeRecommendation, SafetyMetrics};
use warden_leads::{LeadClassification, LeadClassifier, LeadSnapshot};
use warden_override::{
    AutomationControl, EmergencyLevel, EmergencyState, NoopControl, Override, OverrideController,
    OverrideRequest, OverrideStats,
};

/// The combined answer for one proposed send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clearance {
    pub allowed: bool,
    /// Mode/threshold gate outcome for this recipient count, risk, and score.
    pub config_allowed: bool,
    /// True when an active emergency has halted automation.
    pub emergency_blocked: bool,
    pub classification: LeadClassification,
}

/// Dependency-injected aggregate of the four safety components.
pub struct SafetyGovernor {
    store: ConfigStore,
    governor: Arc<ModeGovernor>,
    overrides: OverrideController,
    classifier: LeadClassifier,
}

impl SafetyGovernor {
    pub fn new(
        config: SafetyConfig,
        activation_date: DateTime<Utc>,
        control: Arc<dyn AutomationControl>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let store = ConfigStore::new(config, Arc::clone(&audit));
        let governor = Arc::new(ModeGovernor::new(store.clone(), Arc::clone(&audit)));
        let overrides =
            OverrideController::new(store.clone(), Arc::clone(&governor), control, audit);
        info!(activation_date = %activation_date, "safety governor initialized");
        Self {
            store,
            governor,
            overrides,
            classifier: LeadClassifier::new(activation_date),
        }
    }

    /// Strict-mode defaults, tracing audit, no-op automation hooks.
    pub fn with_defaults(activation_date: DateTime<Utc>) -> Self {
        Self::new(
            SafetyConfig::default(),
            activation_date,
            Arc::new(NoopControl),
            Arc::new(TracingSink),
        )
    }

    // ── Dispatcher surface ─────────────────────────────────────

    pub fn is_automation_allowed(
        &self,
        recipient_count: u32,
        risk_level: RiskLevel,
        safety_score: u8,
    ) -> bool {
        self.store
            .is_automation_allowed(recipient_count, risk_level, safety_score)
    }

    pub fn classify_lead(&self, lead: &LeadSnapshot) -> LeadClassification {
        self.classifier.classify(lead)
    }

    pub fn emergency_state(&self) -> EmergencyState {
        self.overrides.emergency_state()
    }

    pub fn active_overrides(&self) -> Vec<Override> {
        self.overrides.active_overrides()
    }

    /// Full pre-send decision: classification, threshold gate, and emergency
    /// gate must all be favorable.
    pub fn clearance(
        &self,
        recipient_count: u32,
        risk_level: RiskLevel,
        lead: &LeadSnapshot,
    ) -> Clearance {
        let classification = self.classifier.classify(lead);
        let config_allowed =
            self.store
                .is_automation_allowed(recipient_count, risk_level, classification.score);
        let emergency = self.overrides.emergency_state();
        let emergency_blocked = emergency.active && emergency.automation_stopped;

        Clearance {
            allowed: !classification.is_blocked() && config_allowed && !emergency_blocked,
            config_allowed,
            emergency_blocked,
            classification,
        }
    }

    // ── Scheduler entry points ─────────────────────────────────

    pub fn expire_overrides(&self) -> usize {
        self.overrides.expire_overrides()
    }

    pub fn auto_transition_check(&self, metrics: &SafetyMetrics) -> ModeRecommendation {
        self.governor.auto_transition_check(metrics)
    }

    // ── Operator surface ───────────────────────────────────────

    pub fn transition_to(&self, mode: SafetyMode, actor: &str, reason: &str) -> Result<()> {
        self.governor.transition_to(mode, actor, reason)
    }

    pub fn request_override(&self, request: OverrideRequest) -> Result<Override> {
        self.overrides.request_override(request)
    }

    pub fn revoke_override(&self, id: Uuid, actor: &str, reason: &str) -> Result<()> {
        self.overrides.revoke_override(id, actor, reason)
    }

    pub fn activate_emergency_stop(&self, actor: &str, reason: &str, level: EmergencyLevel) {
        self.overrides.activate_emergency_stop(actor, reason, level);
    }

    pub fn deactivate_emergency_stop(&self, actor: &str, reason: &str) -> Result<()> {
        self.overrides.deactivate_emergency_stop(actor, reason)
    }

    pub fn stats(&self) -> SafetyStats {
        self.store.stats()
    }

    pub fn override_stats(&self) -> OverrideStats {
        self.overrides.override_stats()
    }

    // ── Component access ───────────────────────────────────────

    pub fn config_store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn mode_governor(&self) -> &ModeGovernor {
        &self.governor
    }

    pub fn override_controller(&self) -> &OverrideController {
        &self.overrides
    }

    pub fn classifier(&self) -> &LeadClassifier {
        &self.classifier
    }
}
