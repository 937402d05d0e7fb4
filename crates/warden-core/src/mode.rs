use serde::{Deserialize, Serialize};
use std::fmt;

/// Four safety modes, strictness decreasing:
///
/// - **Strict**: Maximum protection — all communications require approval.
/// - **Moderate**: Balanced — auto-approve low-risk, review medium/high.
/// - **Relaxed**: Minimal protection — auto-approve most communications.
/// - **Off**: No protection — all automation allowed (use with extreme caution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SafetyMode {
    Strict = 0,
    Moderate = 1,
    Relaxed = 2,
    Off = 3,
}

impl SafetyMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Strict,
            1 => Self::Moderate,
            2 => Self::Relaxed,
            3 => Self::Off,
            _ => Self::Strict, // safe default
        }
    }

    /// The next mode in the relaxation sequence, if any.
    pub fn next_relaxed(&self) -> Option<Self> {
        match self {
            Self::Strict => Some(Self::Moderate),
            Self::Moderate => Some(Self::Relaxed),
            Self::Relaxed => Some(Self::Off),
            Self::Off => None,
        }
    }

    /// Whether moving to `target` tightens (or keeps) the current strictness.
    pub fn is_tightening_to(&self, target: Self) -> bool {
        target <= *self
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Strict => {
                "Maximum protection - all communications require manual approval except very small, low-risk campaigns"
            }
            Self::Moderate => {
                "Balanced protection - auto-approve low/medium risk campaigns, require approval for high-risk"
            }
            Self::Relaxed => {
                "Minimal protection - auto-approve most campaigns, basic safety checks only"
            }
            Self::Off => "NO PROTECTION - all automation allowed (use with extreme caution)",
        }
    }

    /// Operator guidance for working in this mode, logged after every transition.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Strict => {
                "All campaigns require approval. Start with small, low-risk communications to build confidence."
            }
            Self::Moderate => {
                "Low-risk campaigns auto-approved. Monitor performance closely for 2-3 weeks."
            }
            Self::Relaxed => {
                "Most campaigns auto-approved. Continue monitoring engagement and complaint rates."
            }
            Self::Off => {
                "All protections disabled. Monitor performance very closely and be prepared to re-enable safety."
            }
        }
    }
}

impl fmt::Display for SafetyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Moderate => "Moderate",
            Self::Relaxed => "Relaxed",
            Self::Off => "Off",
        })
    }
}
