//! # warden-config
//!
//! The configuration store for the safety governor. Owns the single current
//! `SafetyConfig` (mode + thresholds) and is the only component permitted to
//! mutate it. Applying a mode rewrites every threshold sub-structure under
//! one write lock, so a reader never observes a mix of old and new values.

pub mod loader;
pub mod schema;
pub mod store;

pub use loader::load_config;
pub use schema::{
    AutoApprovalThresholds, CommunicationLimits, EmergencyControls, LeadProtectionSettings,
    OverrideSettings, SafetyConfig, SafetyStats,
};
pub use store::ConfigStore;
