//! The map phase: turn one record into one keyed, tagged payload.

use crate::join::{encode_payload, JoinError};
use crate::record::{self, KEY_FIELD, MIN_FIELDS};
use crate::{KeyValue, Side};
use bytes::Bytes;

/// Tag a single record from the given relation.
///
/// The join key is the field at index 1. Left records keep their full
/// field sequence; right records drop the key field, preserving the order
/// of the remaining fields (the joiner writes the key back from the left
/// side). Exactly one pair comes out per record: no filtering, no
/// deduplication, no side effects, and the same `(side, record)` input
/// always produces the same pair, so a retried map task reproduces its
/// output exactly.
///
/// A record with fewer than [`MIN_FIELDS`] fields has no join key and
/// fails the task rather than being skipped.
pub fn tag(side: Side, record: &str) -> Result<KeyValue, JoinError> {
    let fields = record::split_fields(record);
    if fields.len() < MIN_FIELDS {
        return Err(JoinError::MalformedRecord {
            found: fields.len(),
            record: record.to_string(),
        });
    }
    let key = Bytes::copy_from_slice(fields[KEY_FIELD].as_bytes());

    let payload = match side {
        Side::Left => encode_payload(side, &fields),
        Side::Right => {
            let mut kept = Vec::with_capacity(fields.len() - 1);
            for (i, field) in fields.iter().enumerate() {
                if i != KEY_FIELD {
                    kept.push(*field);
                }
            }
            encode_payload(side, &kept)
        }
    };
    Ok(KeyValue::new(key, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_records_keep_every_field() {
        let kv = tag(Side::Left, "a1 k1 x").unwrap();
        assert_eq!(kv.key, &b"k1"[..]);
        assert_eq!(kv.value, &b"L a1 k1 x"[..]);
    }

    #[test]
    fn right_records_drop_the_key_field() {
        let kv = tag(Side::Right, "b1 k1 y z").unwrap();
        assert_eq!(kv.key, &b"k1"[..]);
        assert_eq!(kv.value, &b"R b1 y z"[..]);
    }

    #[test]
    fn right_removal_leaves_n_minus_one_fields() {
        // The minimum valid record has two fields, so removal always
        // leaves at least one and the blank placeholder stays unreachable.
        let kv = tag(Side::Right, "b1 k1").unwrap();
        assert_eq!(kv.value, &b"R b1"[..]);
    }

    #[test]
    fn key_is_the_second_field_on_both_sides() {
        assert_eq!(tag(Side::Left, "a1 k1").unwrap().key, &b"k1"[..]);
        assert_eq!(tag(Side::Right, "b1 k1").unwrap().key, &b"k1"[..]);
    }

    #[test]
    fn short_records_fail_instead_of_being_skipped() {
        assert_eq!(
            tag(Side::Left, "lonely"),
            Err(JoinError::MalformedRecord {
                found: 1,
                record: "lonely".into()
            })
        );
        assert_eq!(
            tag(Side::Right, ""),
            Err(JoinError::MalformedRecord {
                found: 0,
                record: "".into()
            })
        );
        assert!(tag(Side::Left, "   ").is_err());
    }

    #[test]
    fn surrounding_whitespace_is_normalized_away() {
        let kv = tag(Side::Left, "  a1   k1 x ").unwrap();
        assert_eq!(kv.key, &b"k1"[..]);
        assert_eq!(kv.value, &b"L a1 k1 x"[..]);
    }

    #[test]
    fn tagging_is_deterministic() {
        assert_eq!(
            tag(Side::Right, "b1 k1 y z").unwrap(),
            tag(Side::Right, "b1 k1 y z").unwrap()
        );
    }
}
