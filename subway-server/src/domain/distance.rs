//! Segment length type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TopologyError;

/// A strictly positive length between two adjacent stations.
///
/// All arithmetic is exact integer arithmetic. The only two operations
/// that change a length are splitting (subtraction) and merging (addition).
/// Every length fits in an `i64`, which is how it is read back from storage.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let d = Distance::new(10).unwrap();
/// assert_eq!(d.get(), 10);
///
/// assert!(Distance::new(0).is_err());
/// assert!(Distance::new(-3).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Distance(u64);

impl Distance {
    /// The longest representable length.
    pub const MAX: Distance = Distance(i64::MAX as u64);

    /// Validates a raw length.
    pub fn new(value: i64) -> Result<Self, TopologyError> {
        if value <= 0 {
            return Err(TopologyError::InvalidDistance(value));
        }
        Ok(Distance(value as u64))
    }

    /// Returns the raw length.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns what is left of `self` after carving out `part`.
    ///
    /// `part` must be strictly shorter, otherwise it cannot fit between
    /// the two stations `self` apart.
    pub fn shortened_by(self, part: Distance) -> Result<Distance, TopologyError> {
        if part.0 >= self.0 {
            return Err(TopologyError::DistanceTooLarge {
                existing: self.0,
                requested: part.0,
            });
        }
        Ok(Distance(self.0 - part.0))
    }

    /// Returns the length of two consecutive segments joined into one.
    ///
    /// Fails with [`TopologyError::DistanceOverflow`] above [`Distance::MAX`].
    pub fn joined_with(self, other: Distance) -> Result<Distance, TopologyError> {
        self.0
            .checked_add(other.0)
            .filter(|&sum| sum <= Self::MAX.0)
            .map(Distance)
            .ok_or(TopologyError::DistanceOverflow)
    }
}

impl TryFrom<i64> for Distance {
    type Error = TopologyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Distance::new(value)
    }
}

impl From<Distance> for u64 {
    fn from(d: Distance) -> Self {
        d.0
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
