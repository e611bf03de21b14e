//! Container codec types: optionals, ordered arrays, deduplicated sets and
//! key/value maps.
//!
//! Containers compose recursively — a `Vec<FlatMap<ObjectId, u16>>` encodes
//! exactly as you would expect from the leaf rules. Ordering is always the
//! caller's responsibility for [`FlatSet`] because the protocol sorts
//! different fields by different keys (addresses, instance numbers, vote
//! values); the set only guarantees deduplication.

use serde::{Deserialize, Serialize};

use super::{read_varint, write_varint, CodecError, Decode, Encode};

// ---------------------------------------------------------------------------
// Option — presence flag + value
// ---------------------------------------------------------------------------

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Some(value) => {
                out.push(1);
                value.encode(out);
            }
            None => out.push(0),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        match u8::decode(input)? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(input)?)),
            _ => Err(CodecError::MalformedEncoding("optional flag must be 0 or 1")),
        }
    }
}

// ---------------------------------------------------------------------------
// Vec — varint count + elements in order
// ---------------------------------------------------------------------------

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.len() as u64, out);
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let count = read_varint(input)? as usize;
        let mut items = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            items.push(T::decode(input)?);
        }
        Ok(items)
    }
}

// Pairs appear inside maps; they have no count prefix of their own.
impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
        self.1.encode(out);
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        Ok((A::decode(input)?, B::decode(input)?))
    }
}

// ---------------------------------------------------------------------------
// FlatSet
// ---------------------------------------------------------------------------

/// A deduplicated collection with array wire layout.
///
/// The constructor removes duplicates while preserving first-seen order; it
/// does **not** sort. Whoever builds the field knows its domain sort key and
/// must apply it before construction — authority keys sort by address,
/// whitelists by instance number, votes by vote value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatSet<T>(Vec<T>);

impl<T: PartialEq> FlatSet<T> {
    /// Build a set, dropping duplicates (first occurrence wins).
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let mut out: Vec<T> = Vec::new();
        for item in items {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        FlatSet(out)
    }
}

impl<T> FlatSet<T> {
    pub fn empty() -> Self {
        FlatSet(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Encode> Encode for FlatSet<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl<T: Decode + PartialEq> Decode for FlatSet<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        Ok(FlatSet::new(Vec::<T>::decode(input)?))
    }
}

// ---------------------------------------------------------------------------
// FlatMap
// ---------------------------------------------------------------------------

/// An association list with map wire layout: varint count followed by
/// key/value pairs in insertion order.
///
/// JSON form is `[[key, value], …]`, matching the node. Key ordering is the
/// caller's concern for the same reason as [`FlatSet`] — the authority
/// canonicalization sorts key entries but leaves account entries alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatMap<K, V>(Vec<(K, V)>);

impl<K, V> FlatMap<K, V> {
    pub fn new(entries: Vec<(K, V)>) -> Self {
        FlatMap(entries)
    }

    pub fn empty() -> Self {
        FlatMap(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.0.iter()
    }

    pub fn entries(&self) -> &[(K, V)] {
        &self.0
    }
}

impl<K: Encode, V: Encode> Encode for FlatMap<K, V> {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl<K: Decode, V: Decode> Decode for FlatMap<K, V> {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        Ok(FlatMap(Vec::<(K, V)>::decode(input)?))
    }
}
