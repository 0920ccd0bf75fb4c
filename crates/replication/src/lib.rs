//! Replication strategies for consistent hashing.
//!
//! A replication strategy decides which nodes hold the copies of a key once
//! its primary owner is known. Strategies only compute placement; moving
//! data is the caller's job.

pub mod error;
pub mod strategy;

pub use error::{ReplicationError, Result};
pub use strategy::{ReplicationStrategy, SimpleStrategy};
