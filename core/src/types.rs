//! Shared primitive types used across the retention pipeline.

/// A calendar day as it appears in the input. Canonically `YYYYMMDD`.
pub type DateKey = i64;

/// An opaque user identifier, taken verbatim from the input.
pub type UserId = String;

/// Event flag. Nonzero marks a qualifying (cohort-forming) event.
pub type Flag = i64;

/// Flag applied when the flag field is present but empty.
pub const DEFAULT_FLAG: Flag = 1;
