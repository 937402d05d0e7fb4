use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::Result;

use std::fmt;

/// Severity of an emergency, effects escalating with level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EmergencyLevel {
    /// Minor issues, additional checks only.
    #[default]
    Low = 0,
    /// Moderate issues, forced back to Strict mode.
    Medium = 1,
    /// Major issues, automated campaigns stopped.
    High = 2,
    /// Critical issues, all automation stopped and forced to Strict.
    Critical = 3,
}

impl EmergencyLevel {
    /// Fixed, informational resolution checklist for this level.
    pub fn resolution_steps(&self) -> Vec<String> {
        let steps: &[&str] = match self {
            Self::Critical => &[
                "Investigate root cause immediately",
                "Contact system administrator",
                "Review all recent changes",
                "Verify data integrity",
                "Test systems before reactivation",
            ],
            Self::High => &[
                "Review recent campaign performance",
                "Check for complaint spikes",
                "Verify lead data quality",
                "Test automation workflows",
            ],
            Self::Medium => &[
                "Monitor performance metrics",
                "Review safety thresholds",
                "Check system logs",
                "Validate recent changes",
            ],
            Self::Low => &[
                "Monitor for 30 minutes",
                "Review performance trends",
                "Check for anomalies",
            ],
        };
        steps.iter().map(|s| (*s).to_string()).collect()
    }
}

impl fmt::Display for EmergencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        })
    }
}

/// Singleton mutable record of the current emergency status. Activation
/// always overwrites any prior state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyState {
    pub active: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub activated_by: String,
    pub reason: String,
    pub level: EmergencyLevel,
    pub automation_stopped: bool,
    pub affected_systems: Vec<String>,
    pub resolution_steps: Vec<String>,
}

/// External hooks the emergency cascade drives. Implemented by the host's
/// automation dispatcher; the governor itself moves no messages.
pub trait AutomationControl: Send + Sync {
    /// Stop all automation immediately (Critical).
    fn stop_all_automation(&self) -> Result<()>;
    /// Stop automated campaigns, manual operations continue (High).
    fn stop_automated_campaigns(&self) -> Result<()>;
    /// Apply additional safety checks (Low).
    fn enable_additional_checks(&self) -> Result<()>;
    /// Restore normal operations after deactivation.
    fn restore_normal_operations(&self) -> Result<()>;
}

/// Default hook implementation for hosts that only want the state machine.
#[derive(Debug, Default)]
pub struct NoopControl;

impl AutomationControl for NoopControl {
    fn stop_all_automation(&self) -> Result<()> {
        Ok(())
    }

    fn stop_automated_campaigns(&self) -> Result<()> {
        Ok(())
    }

    fn enable_additional_checks(&self) -> Result<()> {
        Ok(())
    }

    fn restore_normal_operations(&self) -> Result<()> {
        Ok(())
    }
}
