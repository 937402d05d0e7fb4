use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::SafetyMode;

/// Automation performance snapshot supplied by the external scheduler.
/// Rates are pre-computed by the caller; `days_in_current_mode` is the
/// caller's wall-clock bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyMetrics {
    pub total_campaigns: u32,
    pub successful_campaigns: u32,
    pub failed_campaigns: u32,
    pub complaint_count: u32,
    pub unsubscribe_count: u32,
    pub success_rate: f64,
    pub complaint_rate: f64,
    pub unsubscribe_rate: f64,
    pub average_engagement_rate: f64,
    pub days_in_current_mode: u32,
    pub last_incident: Option<DateTime<Utc>>,
}

/// Derived, never persisted; recomputed per call from a metrics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRecommendation {
    pub current_mode: SafetyMode,
    pub recommended_mode: SafetyMode,
    /// 0-1 confidence in the recommendation.
    pub confidence: f64,
    pub reason: String,
    /// Metrics that support the recommendation.
    pub supporting_metrics: Vec<String>,
    /// Factors that increase risk.
    pub risk_factors: Vec<String>,
    pub days_in_mode: u32,
    pub ready_for_transition: bool,
}

impl ModeRecommendation {
    fn no_change(mode: SafetyMode, metrics: &SafetyMetrics) -> Self {
        Self {
            current_mode: mode,
            recommended_mode: mode,
            confidence: 0.5,
            reason: String::new(),
            supporting_metrics: Vec::new(),
            risk_factors: Vec::new(),
            days_in_mode: metrics.days_in_current_mode,
            ready_for_transition: false,
        }
    }
}

/// Pure function of (current mode, metrics snapshot). Identical inputs always
/// yield identical output.
pub fn recommend(current_mode: SafetyMode, metrics: &SafetyMetrics) -> ModeRecommendation {
    let rec = ModeRecommendation::no_change(current_mode, metrics);
    match current_mode {
        SafetyMode::Strict => analyze_strict(metrics, rec),
        SafetyMode::Moderate => analyze_moderate(metrics, rec),
        SafetyMode::Relaxed => analyze_relaxed(metrics, rec),
        SafetyMode::Off => analyze_off(metrics, rec),
    }
}

fn analyze_strict(metrics: &SafetyMetrics, mut rec: ModeRecommendation) -> ModeRecommendation {
    let mut positives = 0;

    if metrics.success_rate >= 0.95 {
        rec.supporting_metrics.push("High success rate (95%+)".into());
        positives += 1;
    }
    if metrics.complaint_rate <= 0.01 {
        rec.supporting_metrics.push("Low complaint rate (<1%)".into());
        positives += 1;
    }
    if metrics.days_in_current_mode >= 14 {
        rec.supporting_metrics
            .push("Sufficient time in strict mode (14+ days)".into());
        positives += 1;
    }
    if metrics.total_campaigns >= 10 {
        rec.supporting_metrics
            .push("Sufficient campaign experience (10+ campaigns)".into());
        positives += 1;
    }

    if metrics.complaint_count > 0 {
        rec.risk_factors.push("Recent complaints received".into());
    }
    if f64::from(metrics.failed_campaigns) > f64::from(metrics.successful_campaigns) * 0.1 {
        rec.risk_factors.push("High failure rate".into());
    }

    if positives >= 3 && rec.risk_factors.is_empty() {
        rec.recommended_mode = SafetyMode::Moderate;
        rec.confidence = 0.8;
        rec.reason = "Strong performance metrics support transition to Moderate mode".into();
        rec.ready_for_transition = true;
    } else if positives >= 2 {
        rec.confidence = 0.6;
        rec.reason = "Good performance, but recommend more time in Strict mode".into();
    } else {
        rec.confidence = 0.3;
        rec.reason = "Insufficient performance data or concerning metrics".into();
    }
    rec
}

fn analyze_moderate(metrics: &SafetyMetrics, mut rec: ModeRecommendation) -> ModeRecommendation {
    let mut positives = 0;

    // Higher bar for moving to Relaxed.
    if metrics.success_rate >= 0.97 {
        rec.supporting_metrics
            .push("Very high success rate (97%+)".into());
        positives += 1;
    }
    if metrics.complaint_rate <= 0.005 {
        rec.supporting_metrics
            .push("Very low complaint rate (<0.5%)".into());
        positives += 1;
    }
    if metrics.days_in_current_mode >= 21 {
        rec.supporting_metrics
            .push("Extended time in moderate mode (21+ days)".into());
        positives += 1;
    }
    if metrics.total_campaigns >= 25 {
        rec.supporting_metrics
            .push("Extensive campaign experience (25+ campaigns)".into());
        positives += 1;
    }
    if metrics.average_engagement_rate >= 0.15 {
        rec.supporting_metrics.push("High engagement rate (15%+)".into());
        positives += 1;
    }

    if metrics.complaint_count > 1 {
        rec.risk_factors.push("Multiple complaints received".into());
    }
    if metrics.unsubscribe_rate > 0.02 {
        rec.risk_factors.push("High unsubscribe rate".into());
    }

    if positives >= 4 && rec.risk_factors.is_empty() {
        rec.recommended_mode = SafetyMode::Relaxed;
        rec.confidence = 0.85;
        rec.reason = "Excellent performance metrics support transition to Relaxed mode".into();
        rec.ready_for_transition = true;
    } else if metrics.success_rate < 0.9 || metrics.complaint_rate > 0.02 {
        rec.recommended_mode = SafetyMode::Strict;
        rec.confidence = 0.7;
        rec.reason = "Performance concerns suggest returning to Strict mode".into();
        rec.ready_for_transition = true;
    } else {
        rec.confidence = 0.5;
        rec.reason = "Continue in Moderate mode to build more performance history".into();
    }
    rec
}

fn analyze_relaxed(metrics: &SafetyMetrics, mut rec: ModeRecommendation) -> ModeRecommendation {
    // Very high bar for turning off safety: every criterion at once.
    if metrics.success_rate >= 0.98
        && metrics.complaint_rate <= 0.001
        && metrics.days_in_current_mode >= 30
        && metrics.total_campaigns >= 50
        && metrics.complaint_count == 0
    {
        rec.recommended_mode = SafetyMode::Off;
        rec.confidence = 0.9;
        rec.reason = "Exceptional performance history supports disabling safety protections".into();
        rec.ready_for_transition = true;
        rec.supporting_metrics.extend([
            "98%+ success rate".into(),
            "<0.1% complaint rate".into(),
            "30+ days experience".into(),
            "50+ campaigns".into(),
            "Zero recent complaints".into(),
        ]);
    } else if metrics.success_rate < 0.95 || metrics.complaint_rate > 0.01 {
        rec.recommended_mode = SafetyMode::Moderate;
        rec.confidence = 0.8;
        rec.reason = "Performance decline suggests returning to Moderate mode".into();
        rec.ready_for_transition = true;
        rec.risk_factors.push("Declining performance metrics".into());
    } else {
        rec.confidence = 0.6;
        rec.reason = "Continue building performance history in Relaxed mode".into();
    }
    rec
}

fn analyze_off(metrics: &SafetyMetrics, mut rec: ModeRecommendation) -> ModeRecommendation {
    // Watch for anything that requires re-enabling protections.
    if metrics.complaint_count > 0 || metrics.success_rate < 0.95 {
        rec.recommended_mode = SafetyMode::Relaxed;
        rec.confidence = 0.9;
        rec.reason = "Performance issues detected - recommend re-enabling safety protections".into();
        rec.ready_for_transition = true;
        rec.risk_factors
            .push("Performance degradation with safety off".into());
    } else {
        rec.confidence = 0.7;
        rec.reason = "Continue monitoring performance with safety disabled".into();
    }
    rec
}
