//! Utility modules.

/// Timestamp serde helpers for persisted rows.
pub mod datetime;
