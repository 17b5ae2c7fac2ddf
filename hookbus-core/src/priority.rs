//! Priority and arity defaults.

/// Ordering key for callbacks. Lower values execute earlier.
pub type Priority = i32;

/// Priority used when the caller does not pick one.
pub const DEFAULT_PRIORITY: Priority = 10;

/// Number of leading arguments a callback receives when the caller does not pick one.
pub const DEFAULT_ARITY: usize = 1;
