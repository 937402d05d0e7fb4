use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured lead input, validated at the boundary before scoring.
/// Unknown history is expressed as `None`, never as a sentinel value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadSnapshot {
    pub id: String,
    pub status: String,
    pub do_not_contact: bool,
    pub is_existing_tenant: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_contact: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub engagement: Option<EngagementSnapshot>,
}

/// Engagement counters pulled from the CRM, when available.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementSnapshot {
    pub email_opens: u32,
    pub email_clicks: u32,
    pub sms_replies: u32,
    pub calls_answered: u32,
}

impl EngagementSnapshot {
    /// 0-100 engagement sub-score: each channel contributes up to a fixed
    /// cap, replies and answered calls weighted heaviest. Saturating so
    /// extreme counter values cap out instead of overflowing.
    pub fn score(&self) -> u8 {
        let score = self.email_opens.saturating_mul(2).min(20)
            + self.email_clicks.saturating_mul(5).min(25)
            + self.sms_replies.saturating_mul(10).min(30)
            + self.calls_answered.saturating_mul(15).min(25);
        score.min(100) as u8
    }
}
