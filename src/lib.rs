//! A MapReduce-style distributed equi-join (lite).
//!
//! Two delimited-text relations are joined on a shared key with a
//! map/shuffle/reduce pipeline. The [`join::tagger`] reads each record,
//! extracts the join key, and tags the record with the relation it came
//! from; an engine-provided grouping primitive brings every payload for one
//! key together; the [`join::joiner`] splits each group back into its left
//! and right sides and emits their cross product as joined rows.
//!
//! Scheduling, durable storage, and shuffle transport belong to an external
//! execution engine and are consumed through a narrow interface. The
//! [`standalone`] module is the in-process stand-in for that engine, used to
//! run and test the pipeline end to end on local files.

use bytes::Bytes;
use std::hash::Hasher;

pub mod join;
pub mod record;
pub mod standalone;

/////////////////////////////////////////////////////////////////////////////
// Pipeline types
/////////////////////////////////////////////////////////////////////////////

/// Which relation a partition of records belongs to.
///
/// Relation identity is a property of the input partition, resolved once
/// before any record in the partition is tagged and fixed for the lifetime
/// of a pipeline run. It is passed into the tagger explicitly, never
/// inferred from record contents or from input path naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A single key-value pair flowing between the map and reduce phases.
///
/// For this pipeline the key is always the join key (field 1 of the source
/// record) and the value is a tagged payload in the wire form described in
/// [`join`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyValue {
    /// The join key.
    pub key: Bytes,
    /// The tagged payload.
    pub value: Bytes,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: Bytes, value: Bytes) -> Self {
        Self { key, value }
    }

    /// Get the key of this key-value pair.
    ///
    /// This method is cheap, since [`Bytes`] are cheaply cloneable.
    #[inline]
    pub fn key(&self) -> Bytes {
        self.key.clone()
    }

    /// Get the value of this key-value pair.
    ///
    /// This method is cheap, since [`Bytes`] are cheaply cloneable.
    #[inline]
    pub fn value(&self) -> Bytes {
        self.value.clone()
    }

    /// Consumes the key-value pair and returns the key.
    #[inline]
    pub fn into_key(self) -> Bytes {
        self.key
    }

    /// Consumes the key-value pair and returns the value.
    #[inline]
    pub fn into_value(self) -> Bytes {
        self.value
    }
}

/// Hashes an intermediate key. Compute a reduce bucket for a given key by
/// calculating `ihash(key) % n_reduce`.
///
/// Every occurrence of a key maps to the same bucket, which is what lets a
/// reduce task assume it holds the complete payload group for each key it
/// owns. The sign-bit mask keeps the value in non-negative `i32` range so
/// bucket numbers stay stable across platforms.
pub fn ihash(key: &[u8]) -> u32 {
    let mut hasher = fnv::FnvHasher::with_key(0);
    hasher.write(key);
    (hasher.finish() & 0x7fff_ffff) as u32
}
