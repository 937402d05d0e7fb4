use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_config::{AutoApprovalThresholds, CommunicationLimits, SafetyConfig};
use warden_core::RiskLevel;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideType {
    /// Temporary override with expiration.
    Temporary,
    /// Emergency override (immediate, short duration).
    Emergency,
    /// Maintenance override (scheduled, longer duration).
    Maintenance,
    /// Admin override (manual, flexible duration).
    Admin,
}

impl fmt::Display for OverrideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temporary => "Temporary",
            Self::Emergency => "Emergency",
            Self::Maintenance => "Maintenance",
            Self::Admin => "Admin",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideScope {
    Global,
    Campaign,
    Lead,
}

impl fmt::Display for OverrideScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Global => "global",
            Self::Campaign => "campaign",
            Self::Lead => "lead",
        })
    }
}

/// Deep copy of the threshold sub-structures an override replaces. This is
/// the concrete snapshot-then-restore representation: what was effective at
/// creation comes back verbatim on expiry or revocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub auto_approval: AutoApprovalThresholds,
    pub communication_limits: CommunicationLimits,
}

impl SettingsSnapshot {
    pub fn of(config: &SafetyConfig) -> Self {
        Self {
            auto_approval: config.auto_approval.clone(),
            communication_limits: config.communication_limits.clone(),
        }
    }
}

/// The fields an override may loosen or tighten; unset fields keep the
/// snapshot's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverridePatch {
    pub max_recipients: Option<u32>,
    pub min_safety_score: Option<u8>,
    pub max_risk_level: Option<RiskLevel>,
    pub max_daily_emails: Option<u32>,
    pub max_daily_sms: Option<u32>,
    pub max_weekly_contacts: Option<u32>,
    pub min_hours_between_contacts: Option<u32>,
}

impl OverridePatch {
    pub fn apply_to(&self, base: &SettingsSnapshot) -> SettingsSnapshot {
        let mut out = base.clone();
        if let Some(v) = self.max_recipients {
            out.auto_approval.max_recipients = v;
        }
        if let Some(v) = self.min_safety_score {
            out.auto_approval.min_safety_score = v;
        }
        if let Some(v) = self.max_risk_level {
            out.auto_approval.max_risk_level = v;
        }
        if let Some(v) = self.max_daily_emails {
            out.communication_limits.max_daily_emails = v;
        }
        if let Some(v) = self.max_daily_sms {
            out.communication_limits.max_daily_sms = v;
        }
        if let Some(v) = self.max_weekly_contacts {
            out.communication_limits.max_weekly_contacts = v;
        }
        if let Some(v) = self.min_hours_between_contacts {
            out.communication_limits.min_hours_between_contacts = v;
        }
        out
    }
}

/// A granted override. Lifecycle: created active -> (expires or revoked) ->
/// inactive; never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Override {
    pub id: Uuid,
    pub kind: OverrideType,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub reason: String,
    pub scope: OverrideScope,
    pub target_id: Option<String>,
    pub original_settings: SettingsSnapshot,
    pub override_settings: OverridePatch,
    pub active: bool,
    pub usage_count: u32,
    pub last_used: Option<DateTime<Utc>>,
}

/// An incoming request for a safety override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRequest {
    pub kind: OverrideType,
    pub reason: String,
    pub requested_by: String,
    pub duration_hours: u32,
    pub scope: OverrideScope,
    pub target_id: Option<String>,
    pub settings: OverridePatch,
}
