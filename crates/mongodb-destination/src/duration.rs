//! Duration parsing for timeout settings.

use std::time::Duration;

/// Error for text that is not a duration expression.
pub use humantime::DurationError as DurationParseError;

/// Parse a duration such as "10s", "250ms", or "1m30s".
///
/// Every term needs a unit; a bare number like "300" is rejected.
/// Surrounding whitespace is ignored.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    humantime::parse_duration(s.trim())
}
