//! The equi-join workload: a map-side tagger and a reduce-side joiner.
//!
//! Records from the two relations meet in the shuffle as tagged payloads.
//! The wire form is one tag byte (`L` or `R`) naming the origin relation,
//! one separator byte (an ASCII space), then the payload's fields joined by
//! single spaces. The [`tagger`] produces these payloads keyed by the join
//! key; the [`joiner`] receives the complete payload group for a key and
//! emits the inner-join cross product of the two origins.
//!
//! # Example
//!
//! Tag one record from each relation and join the resulting group:
//! ```
//! # use anyhow::Result;
//! use mrjoin::join::{joiner, tagger};
//! use mrjoin::Side;
//! # fn main() -> Result<()> {
//! let left = tagger::tag(Side::Left, "a1 k1 x")?;
//! let right = tagger::tag(Side::Right, "b1 k1 y z")?;
//! assert_eq!(left.key, right.key);
//!
//! let rows = joiner::join_group(&left.key(), vec![left.value(), right.value()].into_iter())?;
//! assert_eq!(rows, "a1 k1 x b1 y z\n");
//! # Ok(())
//! # }
//! ```

use crate::record;
use crate::Side;
use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

pub mod joiner;
pub mod tagger;

const TAG_LEFT: u8 = b'L';
const TAG_RIGHT: u8 = b'R';
const TAG_SEPARATOR: u8 = b' ';

/// Everything that can go wrong inside the join itself.
///
/// Any of these fails the owning map or reduce task; none of them is
/// silently skipped, since dropping records would corrupt join
/// completeness. Engine-level failures (lost tasks, lost nodes) are the
/// engine's to retry and never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    /// An input record too short to hold the join key.
    #[error("malformed record: {found} field(s) in {record:?}, need at least 2")]
    MalformedRecord { found: usize, record: String },

    /// A payload whose origin tag is neither `L` nor `R`.
    #[error("unrecognized payload tag {tag:?} for key {key:?}")]
    UnrecognizedTag { tag: char, key: String },

    /// A payload too short to carry an origin tag and its separator.
    #[error("truncated payload of {len} byte(s) for key {key:?}")]
    TruncatedPayload { len: usize, key: String },

    /// A payload whose byte after the origin tag is not the separator.
    #[error("expected a space after the origin tag, found {found:?} for key {key:?}")]
    MissingSeparator { found: char, key: String },

    /// Payload fields that are not valid UTF-8.
    #[error("payload fields are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

fn tag_byte(side: Side) -> u8 {
    match side {
        Side::Left => TAG_LEFT,
        Side::Right => TAG_RIGHT,
    }
}

/// Encode a tagged payload: origin tag, separator, then the fields joined
/// by single spaces.
///
/// An empty field sequence encodes as a single blank placeholder field, so
/// a payload is never shorter than its tag and separator.
pub fn encode_payload<S: std::borrow::Borrow<str>>(side: Side, fields: &[S]) -> Bytes {
    let joined = record::join_fields(fields);
    let mut buf = BytesMut::with_capacity(2 + joined.len());
    buf.put_u8(tag_byte(side));
    buf.put_u8(TAG_SEPARATOR);
    buf.put(joined.as_bytes());
    buf.freeze()
}

/// Decode a tagged payload into its origin and its joined field sequence.
///
/// The `key` is only used to annotate errors with the group they came
/// from. Unknown tags are a hard failure: anything other than `L`/`R`
/// reaching a reduce task means the shuffle delivered data this join never
/// produced.
pub fn decode_payload<'a>(key: &[u8], payload: &'a [u8]) -> Result<(Side, &'a str), JoinError> {
    let err_key = || String::from_utf8_lossy(key).into_owned();
    let (&tag, rest) = payload.split_first().ok_or_else(|| JoinError::TruncatedPayload {
        len: payload.len(),
        key: err_key(),
    })?;
    let side = match tag {
        TAG_LEFT => Side::Left,
        TAG_RIGHT => Side::Right,
        other => {
            return Err(JoinError::UnrecognizedTag {
                tag: other as char,
                key: err_key(),
            })
        }
    };
    let (&sep, fields) = rest.split_first().ok_or_else(|| JoinError::TruncatedPayload {
        len: payload.len(),
        key: err_key(),
    })?;
    if sep != TAG_SEPARATOR {
        return Err(JoinError::MissingSeparator {
            found: sep as char,
            key: err_key(),
        });
    }
    Ok((side, std::str::from_utf8(fields)?))
}
