//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination; also used when a run aborts for lack of data
pub const OK: i32 = 0;

/// Service unavailable
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Configuration error
pub const CONFIG: i32 = 78;
