//! # warden-override
//!
//! Scoped, time-boxed exceptions to the active safety thresholds, and the
//! emergency stop state machine with its graduated side-effect cascade.
//! Overrides snapshot the effective settings they replace and restore them
//! exactly on expiry or revocation; they are deactivated, never deleted.

pub mod controller;
pub mod emergency;
pub mod types;

pub use controller::{OverrideController, OverrideStats};
pub use emergency::{AutomationControl, EmergencyLevel, EmergencyState, NoopControl};
pub use types::{Override, OverridePatch, OverrideRequest, OverrideScope, OverrideType, SettingsSnapshot};
