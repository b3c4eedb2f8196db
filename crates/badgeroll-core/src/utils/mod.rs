//! Utility functions for string formatting and manipulation.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{normalize_phone, tel_uri, truncate, DEFAULT_COUNTRY_PREFIX};
