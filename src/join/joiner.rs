//! The reduce phase: cross-join one key's complete payload group.
//!

use crate::join::{decode_payload, JoinError};
use crate::Side;
use bytes::{BufMut, Bytes, BytesMut};

/// Join the complete payload group for one key.
///
/// The engine guarantees `payloads` holds every payload emitted for this
/// key across both relations, so the group can be split by origin and both
/// sides buffered in full before any row is emitted. The output is the
/// inner-join cross product: one row per (left item, right item) pair,
/// rows newline-terminated, each row the left fields followed by the right
/// fields joined with single spaces and trimmed once. If either side of
/// the group is empty nothing is emitted; unmatched keys never survive.
///
/// Emission order is fixed for reproducibility: left items in arrival
/// order on the outer loop, right items in arrival order on the inner
/// loop. Both sides are materialized in memory along with their cross
/// product, so keys with very large fan-out on both sides are a known
/// scaling limit of this join.
pub fn join_group(key: &[u8], payloads: impl Iterator<Item = Bytes>) -> Result<Bytes, JoinError> {
    let mut left: Vec<String> = Vec::new();
    let mut right: Vec<String> = Vec::new();
    for payload in payloads {
        let (side, fields) = decode_payload(key, &payload)?;
        match side {
            Side::Left => left.push(fields.to_string()),
            Side::Right => right.push(fields.to_string()),
        }
    }

    let mut out = BytesMut::new();
    for l in &left {
        for r in &right {
            let row = format!("{} {}", l, r);
            out.put(row.trim().as_bytes());
            out.put_u8(b'\n');
        }
    }
    Ok(out.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(payloads: &[&'static [u8]]) -> impl Iterator<Item = Bytes> {
        payloads
            .iter()
            .copied()
            .map(Bytes::from_static)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn joins_one_pair_per_key() {
        let rows = join_group(b"k1", group(&[b"L a1 k1 x", b"R b1 y z"])).unwrap();
        assert_eq!(rows, &b"a1 k1 x b1 y z\n"[..]);
    }

    #[test]
    fn emits_the_full_cross_product_in_fixed_order() {
        let rows = join_group(b"k1", group(&[b"L a k1 1", b"L a k1 2", b"R b 3"])).unwrap();
        assert_eq!(rows, &b"a k1 1 b 3\na k1 2 b 3\n"[..]);

        let rows = join_group(
            b"k1",
            group(&[b"L l1 k1", b"R r1", b"L l2 k1", b"R r2"]),
        )
        .unwrap();
        // Left items drive the outer loop, right items the inner loop,
        // both in arrival order even when arrivals interleave.
        assert_eq!(rows, &b"l1 k1 r1\nl1 k1 r2\nl2 k1 r1\nl2 k1 r2\n"[..]);
    }

    #[test]
    fn row_count_is_left_size_times_right_size() {
        let rows = join_group(
            b"k",
            group(&[b"L a k", b"L b k", b"L c k", b"R 1", b"R 2"]),
        )
        .unwrap();
        let text = std::str::from_utf8(&rows).unwrap();
        assert_eq!(text.lines().count(), 3 * 2);
    }

    #[test]
    fn unmatched_keys_emit_nothing() {
        let rows = join_group(b"k1", group(&[b"L a1 k1 x", b"L a2 k1 y"])).unwrap();
        assert!(rows.is_empty());
        let rows = join_group(b"k1", group(&[b"R b1 z"])).unwrap();
        assert!(rows.is_empty());
        let rows = join_group(b"k1", group(&[])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn blank_placeholder_contributes_no_fields() {
        // A right payload holding only the blank placeholder joins to the
        // left fields alone; the trailing separator is trimmed away.
        let rows = join_group(b"k1", group(&[b"L a1 k1 x", b"R "])).unwrap();
        assert_eq!(rows, &b"a1 k1 x\n"[..]);
    }

    #[test]
    fn unknown_tags_fail_the_group() {
        let err = join_group(b"k1", group(&[b"L a1 k1 x", b"Q b1 y"])).unwrap_err();
        assert_eq!(
            err,
            JoinError::UnrecognizedTag {
                tag: 'Q',
                key: "k1".into()
            }
        );
    }

    #[test]
    fn corrupt_payloads_fail_the_group() {
        let err = join_group(b"k1", group(&[b"L"])).unwrap_err();
        assert_eq!(
            err,
            JoinError::TruncatedPayload {
                len: 1,
                key: "k1".into()
            }
        );
    }
}
