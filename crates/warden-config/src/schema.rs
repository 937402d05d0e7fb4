use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::{RiskLevel, SafetyMode};

/// The complete safety configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub mode: SafetyMode,
    pub enabled: bool,
    pub last_modified: DateTime<Utc>,
    pub modified_by: String,

    pub auto_approval: AutoApprovalThresholds,
    pub lead_protection: LeadProtectionSettings,
    pub communication_limits: CommunicationLimits,
    pub emergency_controls: EmergencyControls,
    pub override_settings: OverrideSettings,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        // Strict mode is the startup default.
        Self {
            mode: SafetyMode::Strict,
            enabled: true,
            last_modified: Utc::now(),
            modified_by: "system".into(),
            auto_approval: AutoApprovalThresholds::for_mode(SafetyMode::Strict),
            lead_protection: LeadProtectionSettings::default(),
            communication_limits: CommunicationLimits::for_mode(SafetyMode::Strict),
            emergency_controls: EmergencyControls::for_mode(SafetyMode::Strict),
            override_settings: OverrideSettings::default(),
        }
    }
}

impl SafetyConfig {
    /// Rewrite the mode and every mode-keyed threshold sub-structure together.
    /// Callers must hold the store's write lock so readers never see a mix.
    pub fn apply_mode(&mut self, mode: SafetyMode, actor: &str) {
        self.mode = mode;
        self.auto_approval = AutoApprovalThresholds::for_mode(mode);
        self.communication_limits = CommunicationLimits::for_mode(mode);
        self.emergency_controls = EmergencyControls::for_mode(mode);
        if mode == SafetyMode::Off {
            // Absolute protections survive even with safety off.
            self.lead_protection.respect_do_not_contact = true;
            self.lead_protection.protect_existing_tenants = true;
        }
        self.last_modified = Utc::now();
        self.modified_by = actor.to_string();
    }
}

// ── Approval thresholds ────────────────────────────────────────

/// When communications can be auto-approved without a human in the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoApprovalThresholds {
    /// Max recipients for auto-approval.
    pub max_recipients: u32,
    /// Minimum safety score required (0-100).
    pub min_safety_score: u8,
    /// Maximum risk level for auto-approval.
    pub max_risk_level: RiskLevel,
    /// All recipients must classify as "Safe".
    pub require_all_safe_recipients: bool,
    /// Block if contacted within the threshold below.
    pub block_recently_contacted: bool,
    pub recent_contact_threshold_hours: u32,
}

impl Default for AutoApprovalThresholds {
    fn default() -> Self {
        Self::for_mode(SafetyMode::Strict)
    }
}

impl AutoApprovalThresholds {
    pub fn for_mode(mode: SafetyMode) -> Self {
        match mode {
            SafetyMode::Strict => Self {
                max_recipients: 5,
                min_safety_score: 90,
                max_risk_level: RiskLevel::Low,
                require_all_safe_recipients: true,
                block_recently_contacted: true,
                recent_contact_threshold_hours: 72,
            },
            SafetyMode::Moderate => Self {
                max_recipients: 25,
                min_safety_score: 75,
                max_risk_level: RiskLevel::Medium,
                require_all_safe_recipients: false,
                block_recently_contacted: true,
                recent_contact_threshold_hours: 48,
            },
            SafetyMode::Relaxed => Self {
                max_recipients: 100,
                min_safety_score: 60,
                max_risk_level: RiskLevel::High,
                require_all_safe_recipients: false,
                block_recently_contacted: false,
                recent_contact_threshold_hours: 24,
            },
            SafetyMode::Off => Self {
                max_recipients: 1000,
                min_safety_score: 0,
                max_risk_level: RiskLevel::Critical,
                require_all_safe_recipients: false,
                block_recently_contacted: false,
                recent_contact_threshold_hours: 0,
            },
        }
    }
}

// ── Lead protection ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadProtectionSettings {
    pub protect_old_leads: bool,
    pub old_lead_threshold_days: u32,
    pub protect_inactive_leads: bool,
    pub inactive_threshold_days: u32,
    /// Always respect "Do Not Contact" status.
    pub respect_do_not_contact: bool,
    pub protect_existing_tenants: bool,
    pub require_opt_in: bool,
}

impl Default for LeadProtectionSettings {
    fn default() -> Self {
        Self {
            protect_old_leads: true,
            old_lead_threshold_days: 90,
            protect_inactive_leads: true,
            inactive_threshold_days: 30,
            respect_do_not_contact: true,
            protect_existing_tenants: true,
            require_opt_in: true,
        }
    }
}

// ── Communication limits ───────────────────────────────────────

/// Rate limits and frequency controls, per lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationLimits {
    pub max_daily_emails: u32,
    pub max_daily_sms: u32,
    pub max_weekly_contacts: u32,
    pub min_hours_between_contacts: u32,
    pub respect_quiet_hours: bool,
    /// 24-hour clock.
    pub quiet_hours_start: u8,
    pub quiet_hours_end: u8,
}

impl Default for CommunicationLimits {
    fn default() -> Self {
        Self::for_mode(SafetyMode::Strict)
    }
}

impl CommunicationLimits {
    pub fn for_mode(mode: SafetyMode) -> Self {
        let (emails, sms, weekly, gap_hours) = match mode {
            SafetyMode::Strict => (1, 1, 3, 24),
            SafetyMode::Moderate => (3, 2, 7, 12),
            SafetyMode::Relaxed => (5, 3, 15, 6),
            SafetyMode::Off => (50, 20, 100, 0),
        };
        Self {
            max_daily_emails: emails,
            max_daily_sms: sms,
            max_weekly_contacts: weekly,
            min_hours_between_contacts: gap_hours,
            respect_quiet_hours: true,
            quiet_hours_start: 20,
            quiet_hours_end: 8,
        }
    }
}

// ── Emergency controls ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyControls {
    pub enable_emergency_stop: bool,
    pub auto_stop_on_high_failure: bool,
    /// Failure rate that triggers auto-stop.
    pub failure_rate_threshold: f64,
    pub enable_complaint_stop: bool,
    /// Number of complaints that triggers stop.
    pub complaint_threshold: u32,
}

impl Default for EmergencyControls {
    fn default() -> Self {
        Self::for_mode(SafetyMode::Strict)
    }
}

impl EmergencyControls {
    pub fn for_mode(mode: SafetyMode) -> Self {
        let (complaints, failure_rate) = match mode {
            SafetyMode::Strict => (1, 0.1),
            SafetyMode::Moderate => (3, 0.2),
            SafetyMode::Relaxed => (5, 0.3),
            SafetyMode::Off => (20, 0.5),
        };
        Self {
            enable_emergency_stop: true,
            auto_stop_on_high_failure: true,
            failure_rate_threshold: failure_rate,
            enable_complaint_stop: true,
            complaint_threshold: complaints,
        }
    }
}

// ── Override settings ──────────────────────────────────────────

/// Who may override safety settings, and for how long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSettings {
    pub allow_admin_override: bool,
    pub allow_temporary_override: bool,
    /// Hours before an override expires by default.
    pub override_timeout_hours: u32,
    pub require_override_reason: bool,
    /// Explicit allow-list of actors authorized to override.
    pub authorized_override_users: Vec<String>,
}

impl Default for OverrideSettings {
    fn default() -> Self {
        Self {
            allow_admin_override: true,
            allow_temporary_override: true,
            override_timeout_hours: 24,
            require_override_reason: true,
            authorized_override_users: vec!["admin".into()],
        }
    }
}

// ── Stats ──────────────────────────────────────────────────────

/// Point-in-time summary of the active settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyStats {
    pub mode: SafetyMode,
    pub enabled: bool,
    pub max_auto_recipients: u32,
    pub min_safety_score: u8,
    pub max_risk_level: RiskLevel,
    pub daily_email_limit: u32,
    pub daily_sms_limit: u32,
    pub emergency_stop_enabled: bool,
    pub last_modified: DateTime<Utc>,
    pub modified_by: String,
}
