//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys (node addresses, vnode
//! slot numbers, cell identifiers) into tokens that can be placed on the
//! hash ring.

pub mod sip;
pub mod traits;
pub mod xxh3;

use serde::{Deserialize, Serialize};

pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;

use crate::token::Token;

/// Configurable choice of partitioner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionerKind {
    #[default]
    Xxh3,
    Sip,
}

impl Partitioner for PartitionerKind {
    fn partition(&self, key: &[u8]) -> Token {
        match self {
            PartitionerKind::Xxh3 => Xxh3Partitioner.partition(key),
            PartitionerKind::Sip => SipPartitioner.partition(key),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PartitionerKind::Xxh3 => Xxh3Partitioner.name(),
            PartitionerKind::Sip => SipPartitioner.name(),
        }
    }
}
