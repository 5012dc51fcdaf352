//! SQL type tags.
//!
//! A `SqlType` travels with a bound parameter so the execution side can pick
//! a driver-level conversion. Statement text never depends on it.

use serde::Serialize;

/// SQL data types a column may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SqlType {
    // Integer types
    TinyInt,
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,

    // Fixed precision
    Decimal { precision: u8, scale: u8 },

    // Boolean
    Boolean,

    // String types
    Char(u32),
    VarChar(u32),
    Text,

    // Binary
    Blob,

    // Date/time types
    Date,
    Time,
    Timestamp,

    Uuid,
    Json,

    // Custom type name
    Custom(&'static str),
}
