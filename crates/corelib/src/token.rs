//! Ring tokens.
//!
//! A token is a position in the 64-bit key space of the ring. Placement keys,
//! vnode slots and cells are all hashed into tokens by a
//! [`Partitioner`](crate::partitioner::Partitioner).

use std::fmt;

/// Position on the ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Token(pub u64);

impl Token {
    pub const MIN: Token = Token(0);
    pub const MAX: Token = Token(u64::MAX);

    /// Raw key-space value.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Clockwise distance from `self` to `other` on the ring.
    pub fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
