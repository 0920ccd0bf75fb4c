//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Partitioners are stateless and deterministic: the same key always yields
/// the same token, in every process, so any participant can compute
/// placement without coordination.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a token.
    fn partition(&self, key: &[u8]) -> Token;

    /// Hashes a string key.
    fn partition_str(&self, key: &str) -> Token {
        self.partition(key.as_bytes())
    }

    /// Hashes the little-endian bytes of a 64-bit value.
    ///
    /// Used for vnode slot numbers and cell identifiers.
    fn partition_u64(&self, value: u64) -> Token {
        self.partition(&value.to_le_bytes())
    }

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
