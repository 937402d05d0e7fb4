use serde::{Deserialize, Serialize};
use warden_core::SafetyMode;

/// One phase of the graduated relaxation plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionPhase {
    pub phase: u8,
    pub mode: SafetyMode,
    pub duration: String,
    pub goals: Vec<String>,
    pub next_mode: String,
}

/// Informational roadmap for relaxing safety from the current mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionPlan {
    pub current_mode: SafetyMode,
    pub phases: Vec<TransitionPhase>,
}

impl TransitionPlan {
    pub fn for_mode(current_mode: SafetyMode) -> Self {
        let phases = match current_mode {
            SafetyMode::Strict => vec![
                TransitionPhase {
                    phase: 1,
                    mode: SafetyMode::Strict,
                    duration: "2-4 weeks".into(),
                    goals: vec![
                        "Build confidence with manual approvals".into(),
                        "Achieve 95%+ success rate".into(),
                        "Complete 10+ campaigns".into(),
                        "Zero complaints".into(),
                    ],
                    next_mode: "Moderate".into(),
                },
                TransitionPhase {
                    phase: 2,
                    mode: SafetyMode::Moderate,
                    duration: "3-4 weeks".into(),
                    goals: vec![
                        "Maintain 97%+ success rate".into(),
                        "Complete 25+ campaigns".into(),
                        "<0.5% complaint rate".into(),
                        "High engagement rates".into(),
                    ],
                    next_mode: "Relaxed".into(),
                },
                TransitionPhase {
                    phase: 3,
                    mode: SafetyMode::Relaxed,
                    duration: "4+ weeks".into(),
                    goals: vec![
                        "Maintain 98%+ success rate".into(),
                        "Complete 50+ campaigns".into(),
                        "<0.1% complaint rate".into(),
                        "Consistent performance".into(),
                    ],
                    next_mode: "Off (Optional)".into(),
                },
            ],
            SafetyMode::Moderate => vec![TransitionPhase {
                phase: 1,
                mode: SafetyMode::Moderate,
                duration: "Current".into(),
                goals: vec![
                    "Maintain excellent performance".into(),
                    "Build campaign experience".into(),
                ],
                next_mode: "Relaxed".into(),
            }],
            // Nothing staged once safety is minimal or off.
            SafetyMode::Relaxed | SafetyMode::Off => Vec::new(),
        };
        Self {
            current_mode,
            phases,
        }
    }
}
