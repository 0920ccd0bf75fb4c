//! Consistent hash ring implementation.
//!
//! The ring manages placement keys and provides the clockwise walk the
//! bounded-load distributor is built on.

pub mod position;
pub mod ring;

pub use position::{NodePosition, NodePositions};
pub use ring::HashRing;
