//! Shared primitive types used across the dashboard.

/// A calendar year as stored in the aggregate tables.
pub type Year = i64;

/// A quarter number, 1 through 4.
pub type Quarter = i64;

/// Identifier of a single rendering pass.
pub type RequestId = String;
