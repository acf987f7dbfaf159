//! Rolling identity hashing
//!
//! Provides [`IdentityKey`], an opaque order-sensitive key derived from a
//! sequence of node ids. Used to recognise the same sibling cluster across
//! independent fetches without a server-assigned cluster id.

use crate::node::NodeId;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Modulus: the Mersenne prime 2^61 - 1
const MODULUS: u64 = (1 << 61) - 1;

/// Base, larger than any `u32` id
const BASE: u64 = 1_099_511_628_211;

/// Identity key of an ordered sequence of node ids
///
/// Keys are only meaningful within one process; they are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IdentityKey(u64);

impl IdentityKey {
    /// Wrap a raw key value
    #[inline]
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Raw key value
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdentityKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl serde::Serialize for IdentityKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for IdentityKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Incremental polynomial rolling hash: `Σ (id_i + 1) * B^i mod M`
#[derive(Debug, Clone, Copy)]
pub struct RollingHasher {
    hash: u64,
    power: u64,
}

impl RollingHasher {
    /// Start an empty sequence
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { hash: 0, power: 1 }
    }

    /// Append one id to the sequence
    #[inline]
    pub fn push(&mut self, id: NodeId) {
        // Offset by one so that id 0 still moves the hash.
        let term = mul_mod(u64::from(id.value()) + 1, self.power);
        self.hash = (self.hash + term) % MODULUS;
        self.power = mul_mod(self.power, BASE);
    }

    /// Key of everything pushed so far
    #[inline]
    #[must_use]
    pub const fn finish(&self) -> IdentityKey {
        IdentityKey(self.hash)
    }
}

impl Default for RollingHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn mul_mod(a: u64, b: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(MODULUS)) as u64
}

/// Hash an ordered sequence of node ids
#[must_use]
pub fn hash_ids(ids: &[NodeId]) -> IdentityKey {
    let mut hasher = RollingHasher::new();
    for id in ids {
        hasher.push(*id);
    }
    hasher.finish()
}
