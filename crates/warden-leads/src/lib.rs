//! # warden-leads
//!
//! Scores a single candidate lead for automation eligibility. A pure
//! function over caller-supplied data: no shared state, never errors, safe
//! for unbounded concurrent invocation. Missing optional fields simply skip
//! their adjustment.

pub mod classify;
pub mod snapshot;

pub use classify::{LeadClassification, LeadClassifier, LeadSafetyLevel};
pub use snapshot::{EngagementSnapshot, LeadSnapshot};
