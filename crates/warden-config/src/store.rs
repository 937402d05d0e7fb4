use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};
use warden_core::{AuditEvent, AuditSink, Result, RiskLevel, SafetyMode, TracingSink};

use crate::schema::{AutoApprovalThresholds, CommunicationLimits, SafetyConfig, SafetyStats};

/// Owns the single current safety configuration. Reads vastly outnumber
/// writes; everything is serialized through one reader-writer lock so the
/// automation gate never observes a partially-applied threshold set.
#[derive(Clone)]
pub struct ConfigStore {
    config: Arc<RwLock<SafetyConfig>>,
    audit: Arc<dyn AuditSink>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(SafetyConfig::default(), Arc::new(TracingSink))
    }
}

impl ConfigStore {
    pub fn new(config: SafetyConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            audit,
        }
    }

    /// Build a store from the on-disk configuration document, applying
    /// environment overrides. Missing file falls back to strict defaults.
    pub fn load(path: Option<&std::path::Path>, audit: Arc<dyn AuditSink>) -> Result<Self> {
        Ok(Self::new(crate::loader::load_config(path)?, audit))
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> SafetyConfig {
        self.config.read().clone()
    }

    pub fn mode(&self) -> SafetyMode {
        self.config.read().mode
    }

    /// Atomically rewrite the mode and all threshold sub-structures for it.
    pub fn update_mode(&self, mode: SafetyMode, actor: &str) {
        let mut config = self.config.write();
        let from = config.mode;
        config.apply_mode(mode, actor);
        info!(%from, to = %mode, actor, "safety mode updated");
        if mode == SafetyMode::Off {
            warn!("safety mode set to OFF - automation protections disabled");
        }
    }

    pub fn enable(&self, actor: &str) {
        let mut config = self.config.write();
        config.enabled = true;
        config.last_modified = Utc::now();
        config.modified_by = actor.to_string();
        info!(actor, "safety system enabled");
        self.audit.record(AuditEvent::SafetyEnabled {
            actor: actor.to_string(),
        });
    }

    pub fn disable(&self, actor: &str, reason: &str) {
        let mut config = self.config.write();
        config.enabled = false;
        config.last_modified = Utc::now();
        config.modified_by = actor.to_string();
        warn!(actor, reason, "safety system DISABLED");
        self.audit.record(AuditEvent::SafetyDisabled {
            actor: actor.to_string(),
            reason: reason.to_string(),
        });
    }

    /// The automation gate consulted by the dispatcher before every send.
    pub fn is_automation_allowed(
        &self,
        recipient_count: u32,
        risk_level: RiskLevel,
        safety_score: u8,
    ) -> bool {
        let config = self.config.read();

        if config.mode == SafetyMode::Off {
            return true;
        }
        if !config.enabled {
            return false;
        }

        let thresholds = &config.auto_approval;
        if recipient_count > thresholds.max_recipients {
            return false;
        }
        if safety_score < thresholds.min_safety_score {
            return false;
        }
        if risk_level > thresholds.max_risk_level {
            return false;
        }
        true
    }

    /// Export the current configuration as a JSON document.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.config.read())?)
    }

    /// Replace the whole configuration from a JSON document, atomically,
    /// stamping fresh last-modified metadata.
    pub fn import_json(&self, doc: &str, actor: &str) -> Result<()> {
        let mut incoming: SafetyConfig = serde_json::from_str(doc)?;
        incoming.last_modified = Utc::now();
        incoming.modified_by = actor.to_string();
        *self.config.write() = incoming;
        info!(actor, "safety configuration imported");
        self.audit.record(AuditEvent::ConfigImported {
            actor: actor.to_string(),
        });
        Ok(())
    }

    pub fn stats(&self) -> SafetyStats {
        let config = self.config.read();
        SafetyStats {
            mode: config.mode,
            enabled: config.enabled,
            max_auto_recipients: config.auto_approval.max_recipients,
            min_safety_score: config.auto_approval.min_safety_score,
            max_risk_level: config.auto_approval.max_risk_level,
            daily_email_limit: config.communication_limits.max_daily_emails,
            daily_sms_limit: config.communication_limits.max_daily_sms,
            emergency_stop_enabled: config.emergency_controls.enable_emergency_stop,
            last_modified: config.last_modified,
            modified_by: config.modified_by.clone(),
        }
    }

    // ── Override seams ─────────────────────────────────────────
    //
    // The override controller snapshots and restores threshold
    // sub-structures through these; nothing else mutates them piecemeal.

    pub fn replace_auto_approval(&self, thresholds: AutoApprovalThresholds, actor: &str) {
        let mut config = self.config.write();
        config.auto_approval = thresholds;
        config.last_modified = Utc::now();
        config.modified_by = actor.to_string();
    }

    pub fn replace_communication_limits(&self, limits: CommunicationLimits, actor: &str) {
        let mut config = self.config.write();
        config.communication_limits = limits;
        config.last_modified = Utc::now();
        config.modified_by = actor.to_string();
    }
}
