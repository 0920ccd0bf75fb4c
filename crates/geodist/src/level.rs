//! Supported grid resolutions and their cell counts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of cells at each supported resolution.
const CELL_COUNTS: [u64; 7] = [122, 842, 5882, 41162, 288122, 2016842, 14117882];

/// Number of cells at resolution `raw`, `None` outside 0..=6.
pub fn cell_count(raw: u8) -> Option<u64> {
    CELL_COUNTS.get(raw as usize).copied()
}

/// A validated grid resolution, 0 (coarsest) to 6 (finest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(0);
    pub const MAX: Level = Level(6);

    pub fn new(raw: u8) -> Result<Self> {
        if raw > Self::MAX.0 {
            return Err(Error::InvalidResolution(raw));
        }
        Ok(Level(raw))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of cells at this level.
    pub fn cell_count(self) -> u64 {
        CELL_COUNTS[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN.0..=Self::MAX.0).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(5)
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        Level::new(raw)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_counts() {
        let counts: Vec<u64> = Level::all().map(Level::cell_count).collect();
        assert_eq!(
            counts,
            vec![122, 842, 5882, 41162, 288122, 2016842, 14117882]
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Level::new(7), Err(Error::InvalidResolution(7)));
        assert_eq!(cell_count(7), None);
        assert_eq!(cell_count(3), Some(41162));
    }

    #[test]
    fn test_serde() {
        let level: Level = serde_json::from_str("3").unwrap();
        assert_eq!(level.get(), 3);
        assert!(serde_json::from_str::<Level>("9").is_err());
    }
}
