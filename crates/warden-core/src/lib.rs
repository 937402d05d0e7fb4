//! # warden-core
//!
//! Core types for the Warden safety governor: the ordered safety mode and
//! risk level enums, the error taxonomy, and the audit sink every other
//! crate in the workspace records through.

pub mod audit;
pub mod error;
pub mod mode;
pub mod risk;

pub use audit::{AuditEvent, AuditSink, MemorySink, TracingSink};
pub use error::{Result, WardenError};
pub use mode::SafetyMode;
pub use risk::RiskLevel;
