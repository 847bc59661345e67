//! Utility modules.

/// Timestamp serde helpers for provider API responses.
pub mod datetime;

/// Truncation and masking for log output.
pub mod log_sanitizer;
