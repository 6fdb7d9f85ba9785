//! Shared data-layer constants.

/// Default retention window for terminal webhook inbox rows, in days.
pub const DEFAULT_INBOX_RETENTION_DAYS: u32 = 7;

/// Default per-organization concurrent session limit.
pub const DEFAULT_MAX_CONCURRENT_SESSIONS: i32 = 3;
