use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use warden_config::ConfigStore;
use warden_core::{AuditEvent, AuditSink, Result, WardenError};
use warden_governor::ModeGovernor;

use crate::emergency::{AutomationControl, EmergencyLevel, EmergencyState};
use crate::types::{Override, OverrideRequest, OverrideScope, OverrideType, SettingsSnapshot};

/// Manages scoped temporary exceptions and the emergency kill-switch.
pub struct OverrideController {
    store: ConfigStore,
    governor: Arc<ModeGovernor>,
    control: Arc<dyn AutomationControl>,
    audit: Arc<dyn AuditSink>,
    /// Every override ever granted; inactive entries are kept for audit.
    overrides: Mutex<HashMap<Uuid, Override>>,
    /// Effective settings for campaign/lead-scoped overrides. Global-scope
    /// overrides patch the config store directly instead.
    overlays: Mutex<HashMap<(OverrideScope, String), SettingsSnapshot>>,
    emergency: Mutex<EmergencyState>,
}

/// Point-in-time summary of override and emergency activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideStats {
    pub active_overrides: usize,
    pub total_overrides: usize,
    pub emergency_active: bool,
    pub emergency_level: EmergencyLevel,
    pub last_emergency: Option<DateTime<Utc>>,
}

impl OverrideController {
    pub fn new(
        store: ConfigStore,
        governor: Arc<ModeGovernor>,
        control: Arc<dyn AutomationControl>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            store,
            governor,
            control,
            audit,
            overrides: Mutex::new(HashMap::new()),
            overlays: Mutex::new(HashMap::new()),
            emergency: Mutex::new(EmergencyState::default()),
        }
    }

    // ── Overrides ──────────────────────────────────────────────

    /// Validate, authorize, snapshot, apply, and store an override.
    pub fn request_override(&self, request: OverrideRequest) -> Result<Override> {
        Self::validate_request(&request)?;
        self.authorize_request(&request)?;

        let now = Utc::now();
        let original = self.effective_settings(request.scope, request.target_id.as_deref());
        let patched = request.settings.apply_to(&original);

        let override_ = Override {
            id: Uuid::new_v4(),
            kind: request.kind,
            created_by: request.requested_by.clone(),
            created_at: now,
            expires_at: now + Duration::hours(i64::from(request.duration_hours)),
            reason: request.reason,
            scope: request.scope,
            target_id: request.target_id,
            original_settings: original,
            override_settings: request.settings,
            active: true,
            usage_count: 0,
            last_used: None,
        };

        self.apply(&override_, patched);
        self.overrides.lock().insert(override_.id, override_.clone());

        info!(
            id = %override_.id,
            scope = %override_.scope,
            actor = override_.created_by,
            reason = override_.reason,
            "safety override created"
        );
        self.audit.record(AuditEvent::OverrideCreated {
            id: override_.id,
            scope: override_.scope.to_string(),
            actor: override_.created_by.clone(),
            expires_at: override_.expires_at,
        });

        Ok(override_)
    }

    /// Externally-triggered sweep: deactivate and revert every active
    /// override past its expiry. Returns the number expired.
    pub fn expire_overrides(&self) -> usize {
        self.expire_overrides_at(Utc::now())
    }

    /// Sweep against an explicit clock.
    pub fn expire_overrides_at(&self, now: DateTime<Utc>) -> usize {
        // The audit sink is host-supplied and may read controller state back,
        // so it must only run once the overrides lock is released.
        let mut expired_ids = Vec::new();
        {
            let mut overrides = self.overrides.lock();
            for override_ in overrides.values_mut() {
                if override_.active && now > override_.expires_at {
                    self.revert(override_);
                    override_.active = false;
                    expired_ids.push(override_.id);
                }
            }
        }

        for id in &expired_ids {
            info!(%id, "override expired and reverted");
            self.audit.record(AuditEvent::OverrideExpired { id: *id });
        }
        if !expired_ids.is_empty() {
            info!(count = expired_ids.len(), "expired safety overrides");
        }
        expired_ids.len()
    }

    /// Manually revoke an active override.
    pub fn revoke_override(&self, id: Uuid, actor: &str, reason: &str) -> Result<()> {
        {
            let mut overrides = self.overrides.lock();
            let override_ = overrides
                .get_mut(&id)
                .ok_or(WardenError::OverrideNotFound(id))?;

            if !override_.active {
                return Err(WardenError::State(format!("override {id} is not active")));
            }

            let creator = actor == override_.created_by;
            let admin = actor == "admin";
            let emergency =
                actor == "emergency-system" && override_.kind == OverrideType::Emergency;
            if !(creator || admin || emergency) {
                return Err(WardenError::Authorization {
                    actor: actor.to_string(),
                    action: format!("revoke override {id}"),
                });
            }

            self.revert(override_);
            override_.active = false;
        }

        info!(%id, actor, reason, "override revoked");
        self.audit.record(AuditEvent::OverrideRevoked {
            id,
            actor: actor.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Count a use of an active override.
    pub fn record_use(&self, id: Uuid) -> Result<()> {
        let mut overrides = self.overrides.lock();
        let override_ = overrides
            .get_mut(&id)
            .ok_or(WardenError::OverrideNotFound(id))?;
        if !override_.active {
            return Err(WardenError::State(format!("override {id} is not active")));
        }
        override_.usage_count += 1;
        override_.last_used = Some(Utc::now());
        Ok(())
    }

    pub fn active_overrides(&self) -> Vec<Override> {
        self.overrides
            .lock()
            .values()
            .filter(|o| o.active)
            .cloned()
            .collect()
    }

    pub fn get_override(&self, id: Uuid) -> Option<Override> {
        self.overrides.lock().get(&id).cloned()
    }

    /// The threshold set currently in force for a scope/target: a scoped
    /// overlay when one is active, otherwise the global configuration.
    pub fn effective_settings(
        &self,
        scope: OverrideScope,
        target_id: Option<&str>,
    ) -> SettingsSnapshot {
        if scope != OverrideScope::Global {
            if let Some(target) = target_id {
                if let Some(overlay) = self.overlays.lock().get(&(scope, target.to_string())) {
                    return overlay.clone();
                }
            }
        }
        SettingsSnapshot::of(&self.store.config())
    }

    pub fn override_stats(&self) -> OverrideStats {
        let overrides = self.overrides.lock();
        let emergency = self.emergency.lock();
        OverrideStats {
            active_overrides: overrides.values().filter(|o| o.active).count(),
            total_overrides: overrides.len(),
            emergency_active: emergency.active,
            emergency_level: emergency.level,
            last_emergency: emergency.activated_at,
        }
    }

    // ── Emergency stop ─────────────────────────────────────────

    /// Activate the emergency stop. Always succeeds and overwrites any prior
    /// emergency state; side effects are fail-soft (logged, not propagated).
    pub fn activate_emergency_stop(&self, actor: &str, reason: &str, level: EmergencyLevel) {
        warn!(actor, reason, %level, "EMERGENCY STOP ACTIVATED");

        *self.emergency.lock() = EmergencyState {
            active: true,
            activated_at: Some(Utc::now()),
            activated_by: actor.to_string(),
            reason: reason.to_string(),
            level,
            automation_stopped: level >= EmergencyLevel::High,
            affected_systems: vec![
                "automation".into(),
                "campaigns".into(),
                "communications".into(),
            ],
            resolution_steps: level.resolution_steps(),
        };

        match level {
            EmergencyLevel::Critical => {
                if let Err(e) = self.control.stop_all_automation() {
                    warn!(error = %e, "error stopping automation during emergency");
                }
                self.governor.emergency_revert(reason);
            }
            EmergencyLevel::High => {
                if let Err(e) = self.control.stop_automated_campaigns() {
                    warn!(error = %e, "error stopping automated campaigns during emergency");
                }
            }
            EmergencyLevel::Medium => {
                self.governor.emergency_revert(reason);
            }
            EmergencyLevel::Low => {
                if let Err(e) = self.control.enable_additional_checks() {
                    warn!(error = %e, "error enabling additional safety checks");
                }
            }
        }

        self.audit.record(AuditEvent::EmergencyActivated {
            actor: actor.to_string(),
            level: level.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Deactivate the emergency stop and restore normal operations.
    pub fn deactivate_emergency_stop(&self, actor: &str, reason: &str) -> Result<()> {
        if !self.emergency.lock().active {
            return Err(WardenError::State(
                "no active emergency to deactivate".into(),
            ));
        }

        // Host hook runs without the emergency lock held; on failure the
        // emergency stays active.
        self.control.restore_normal_operations()?;

        let activated_at = {
            let mut emergency = self.emergency.lock();
            emergency.active = false;
            emergency.activated_at
        };

        let duration = activated_at
            .map(|at| Utc::now() - at)
            .unwrap_or_else(Duration::zero);
        info!(actor, reason, duration_secs = duration.num_seconds(), "emergency stop deactivated");
        self.audit.record(AuditEvent::EmergencyDeactivated {
            actor: actor.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    pub fn emergency_state(&self) -> EmergencyState {
        self.emergency.lock().clone()
    }

    // ── Internals ──────────────────────────────────────────────

    fn validate_request(request: &OverrideRequest) -> Result<()> {
        if request.reason.is_empty() {
            return Err(WardenError::Validation {
                field: "reason".into(),
                reason: "is required".into(),
            });
        }
        if request.requested_by.is_empty() {
            return Err(WardenError::Validation {
                field: "requested_by".into(),
                reason: "is required".into(),
            });
        }
        if request.duration_hours < 1 || request.duration_hours > 168 {
            return Err(WardenError::Validation {
                field: "duration_hours".into(),
                reason: "must be between 1 and 168 hours".into(),
            });
        }
        if request.scope != OverrideScope::Global
            && request.target_id.as_deref().unwrap_or("").is_empty()
        {
            return Err(WardenError::Validation {
                field: "target_id".into(),
                reason: format!("is required for {} scope", request.scope),
            });
        }
        Ok(())
    }

    fn authorize_request(&self, request: &OverrideRequest) -> Result<()> {
        let settings = self.store.config().override_settings;
        let allow_listed = settings
            .authorized_override_users
            .iter()
            .any(|u| u == &request.requested_by);
        let admin = request.requested_by == "admin";
        let emergency = request.kind == OverrideType::Emergency
            && request.requested_by == "emergency-system";

        if allow_listed || admin || emergency {
            Ok(())
        } else {
            Err(WardenError::Authorization {
                actor: request.requested_by.clone(),
                action: format!("request {} override", request.kind),
            })
        }
    }

    fn apply(&self, override_: &Override, patched: SettingsSnapshot) {
        match override_.scope {
            OverrideScope::Global => {
                self.store
                    .replace_auto_approval(patched.auto_approval, &override_.created_by);
                self.store
                    .replace_communication_limits(patched.communication_limits, &override_.created_by);
            }
            scope => {
                let target = override_.target_id.clone().unwrap_or_default();
                self.overlays.lock().insert((scope, target), patched);
            }
        }
    }

    fn revert(&self, override_: &Override) {
        match override_.scope {
            OverrideScope::Global => {
                self.store.replace_auto_approval(
                    override_.original_settings.auto_approval.clone(),
                    "override-revert",
                );
                self.store.replace_communication_limits(
                    override_.original_settings.communication_limits.clone(),
                    "override-revert",
                );
            }
            scope => {
                let target = override_.target_id.clone().unwrap_or_default();
                self.overlays.lock().remove(&(scope, target));
            }
        }
    }
}
