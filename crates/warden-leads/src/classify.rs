use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::snapshot::LeadSnapshot;

/// Statuses that disqualify a lead from automation outright.
const BLOCKED_STATUSES: [&str; 5] = ["closed", "dead", "unqualified", "spam", "duplicate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LeadSafetyLevel {
    /// No automation allowed.
    Blocked = 0,
    /// Requires manual approval.
    Review = 1,
    /// Full automation approved.
    Safe = 2,
}

impl fmt::Display for LeadSafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blocked => "Blocked",
            Self::Review => "Requires Review",
            Self::Safe => "Safe",
        })
    }
}

/// Derived per lead; computed on demand, not persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadClassification {
    pub lead_id: String,
    pub level: LeadSafetyLevel,
    /// 0-100 suitability-for-automation score.
    pub score: u8,
    pub reasons: Vec<String>,
    pub flags: Vec<String>,
    pub status: String,
    pub do_not_contact: bool,
    pub is_existing_tenant: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_contact: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub engagement_score: u8,
}

impl LeadClassification {
    pub fn is_automation_allowed(&self) -> bool {
        self.level == LeadSafetyLevel::Safe
    }

    pub fn requires_approval(&self) -> bool {
        self.level == LeadSafetyLevel::Review
    }

    pub fn is_blocked(&self) -> bool {
        self.level == LeadSafetyLevel::Blocked
    }
}

/// Scores leads against a fixed system-activation date. Stateless beyond
/// that date; every call is independent.
#[derive(Debug, Clone)]
pub struct LeadClassifier {
    pub activation_date: DateTime<Utc>,
}

impl LeadClassifier {
    pub fn new(activation_date: DateTime<Utc>) -> Self {
        Self { activation_date }
    }

    pub fn classify(&self, lead: &LeadSnapshot) -> LeadClassification {
        self.classify_at(lead, Utc::now())
    }

    /// Classification against an explicit clock, so recency buckets are
    /// deterministic under test.
    pub fn classify_at(&self, lead: &LeadSnapshot, now: DateTime<Utc>) -> LeadClassification {
        let mut flags = Vec::new();
        let engagement_score = lead.engagement.map(|e| e.score()).unwrap_or(0);
        let score = self.score(lead, now, engagement_score, &mut flags);

        let level = match score {
            80..=100 => LeadSafetyLevel::Safe,
            50..=79 => LeadSafetyLevel::Review,
            _ => LeadSafetyLevel::Blocked,
        };

        let mut classification = LeadClassification {
            lead_id: lead.id.clone(),
            level,
            score,
            reasons: Vec::new(),
            flags,
            status: lead.status.clone(),
            do_not_contact: lead.do_not_contact,
            is_existing_tenant: lead.is_existing_tenant,
            created_at: lead.created_at,
            last_contact: lead.last_contact,
            last_activity: lead.last_activity,
            engagement_score,
        };
        self.add_reasons(&mut classification, now);
        classification
    }

    /// Classify a batch. No cross-lead interaction; order is irrelevant.
    pub fn classify_batch(&self, leads: &[LeadSnapshot]) -> HashMap<String, LeadClassification> {
        let now = Utc::now();
        leads
            .iter()
            .map(|lead| {
                let c = self.classify_at(lead, now);
                debug!(lead_id = c.lead_id, level = %c.level, score = c.score, "lead classified");
                (c.lead_id.clone(), c)
            })
            .collect()
    }

    /// Only the leads fully approved for automation.
    pub fn safe_for_automation<'a>(&self, leads: &'a [LeadSnapshot]) -> Vec<&'a LeadSnapshot> {
        let now = Utc::now();
        leads
            .iter()
            .filter(|lead| self.classify_at(lead, now).is_automation_allowed())
            .collect()
    }

    fn score(
        &self,
        lead: &LeadSnapshot,
        now: DateTime<Utc>,
        engagement_score: u8,
        flags: &mut Vec<String>,
    ) -> u8 {
        // Absolute blocks short-circuit everything else.
        if lead.do_not_contact || lead.is_existing_tenant {
            return 0;
        }
        let status = lead.status.to_lowercase();
        if BLOCKED_STATUSES.contains(&status.as_str()) {
            return 0;
        }

        let mut score: i32 = 50;

        // New leads (created after system activation) get high scores.
        if lead.created_at.is_some_and(|c| c > self.activation_date) {
            score += 30;
            flags.push("new_lead".into());
        }

        if let Some(last_activity) = lead.last_activity {
            let days = (now - last_activity).num_days();
            match days {
                ..=7 => {
                    score += 25;
                    flags.push("recent_activity".into());
                }
                8..=30 => {
                    score += 15;
                    flags.push("moderate_activity".into());
                }
                31..=90 => {
                    score += 5;
                    flags.push("old_activity".into());
                }
                _ => {
                    score -= 20;
                    flags.push("stale_activity".into());
                }
            }
        }

        if let Some(last_contact) = lead.last_contact {
            let days = (now - last_contact).num_days();
            if days <= 3 {
                // Recently contacted, avoid spam.
                score -= 10;
                flags.push("recently_contacted".into());
            } else if days <= 14 {
                // Good follow-up timing.
                score += 5;
            } else if days >= 90 {
                // Long quiet, safe to re-engage.
                score += 10;
                flags.push("long_since_contact".into());
            }
        }

        score += match status.as_str() {
            "new" | "open" | "active" => 20,
            "qualified" | "hot" => 25,
            "warm" => 15,
            "cold" => 5,
            "nurture" => 10,
            _ => -5,
        };

        // Up to 20 points for high engagement.
        score += i32::from(engagement_score) / 5;

        score.clamp(0, 100) as u8
    }

    fn add_reasons(&self, classification: &mut LeadClassification, now: DateTime<Utc>) {
        match classification.level {
            LeadSafetyLevel::Blocked => {
                if classification.do_not_contact {
                    classification
                        .reasons
                        .push("Lead marked as 'Do Not Contact'".into());
                }
                if classification.is_existing_tenant {
                    classification.reasons.push("Lead is existing tenant".into());
                }
                if classification.score < 50 {
                    classification
                        .reasons
                        .push("Low safety score due to inactivity or status".into());
                }
            }
            LeadSafetyLevel::Review => {
                classification
                    .reasons
                    .push("Moderate safety score - requires manual review".into());
                if let Some(last_activity) = classification.last_activity {
                    if (now - last_activity).num_days() > 30 {
                        classification
                            .reasons
                            .push("Lead has been inactive for over 30 days".into());
                    }
                }
            }
            LeadSafetyLevel::Safe => {
                classification
                    .reasons
                    .push("High safety score - approved for automation".into());
                if classification
                    .created_at
                    .is_some_and(|c| c > self.activation_date)
                {
                    classification
                        .reasons
                        .push("New lead created after system activation".into());
                }
            }
        }
    }
}
