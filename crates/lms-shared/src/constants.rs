//! Application-wide constants

pub const SEARCH_RESULT_LIMIT: usize = 20;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
