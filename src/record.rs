//! Shared parsing and formatting for delimited-text records.
//!
//! The wire format is plain text: one record per line, fields separated by
//! single ASCII spaces, the join key always at [`KEY_FIELD`]. Records are
//! split into field sequences on the way in and rebuilt by joining the
//! sequence with a single separator on the way out, so a rebuilt record
//! never carries a leading or doubled separator.

use std::borrow::Borrow;

/// Index of the join key within a record's fields (0-based).
pub const KEY_FIELD: usize = 1;

/// The smallest field count a valid record can have. The key index must
/// exist, so this is `KEY_FIELD + 1`.
pub const MIN_FIELDS: usize = KEY_FIELD + 1;

/// Split a record line into its fields.
///
/// Splits on runs of whitespace and ignores leading and trailing
/// whitespace, so no empty fields are ever produced. An empty or
/// whitespace-only line yields no fields at all.
pub fn split_fields(record: &str) -> Vec<&str> {
    record.split_whitespace().collect()
}

/// Rebuild a record from an ordered field sequence, separated by single
/// spaces.
pub fn join_fields<S: Borrow<str>>(fields: &[S]) -> String {
    fields.join(" ")
}
