//! # warden-governor
//!
//! The mode state machine. Tightening is always permitted — emergency
//! tightening must never be blocked. Relaxing is permitted one step at a
//! time, and is never performed automatically.

pub mod governor;
pub mod plan;
pub mod recommend;

pub use governor::{ModeGovernor, ModeTransition};
pub use plan::{TransitionPhase, TransitionPlan};
pub use recommend::{ModeRecommendation, SafetyMetrics, recommend};
