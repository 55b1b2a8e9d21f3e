//! Directed segments between adjacent stations.

use super::{Distance, Station, StationId, TopologyError};

/// Which endpoint an inserted segment shares with the segment it splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedEnd {
    /// Both segments leave the same station
    Up,
    /// Both segments arrive at the same station
    Down,
}

/// One directed edge of a line, from `up` to `down`.
///
/// A segment does not know where it sits in the line; its position is
/// implied by which other segments share its endpoints.
///
/// # Invariants
///
/// - `up != down`
/// - `distance > 0` (enforced by [`Distance`])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    up: Station,
    down: Station,
    distance: Distance,
}

impl Segment {
    /// Builds a segment from already-resolved stations.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `distance` is zero or negative ([`TopologyError::InvalidDistance`])
    /// - `up` and `down` are the same station ([`TopologyError::SameStation`])
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{Segment, Station, StationId};
    ///
    /// let a = Station::new(StationId(1), "A");
    /// let b = Station::new(StationId(2), "B");
    ///
    /// let seg = Segment::new(a.clone(), b, 10).unwrap();
    /// assert_eq!(seg.distance().get(), 10);
    ///
    /// assert!(Segment::new(a.clone(), a, 10).is_err());
    /// ```
    pub fn new(up: Station, down: Station, distance: i64) -> Result<Self, TopologyError> {
        let distance = Distance::new(distance)?;
        Self::with_distance(up, down, distance)
    }

    /// Builds a segment from an already-validated distance.
    pub fn with_distance(
        up: Station,
        down: Station,
        distance: Distance,
    ) -> Result<Self, TopologyError> {
        if up == down {
            return Err(TopologyError::SameStation(up.id()));
        }
        Ok(Segment { up, down, distance })
    }

    /// Returns the station this segment leaves from.
    pub fn up(&self) -> &Station {
        &self.up
    }

    /// Returns the station this segment arrives at.
    pub fn down(&self) -> &Station {
        &self.down
    }

    /// Returns the segment length.
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Returns both endpoints, for membership tests.
    pub fn endpoints(&self) -> [&Station; 2] {
        [&self.up, &self.down]
    }

    /// Returns true if `station` is either endpoint.
    pub fn touches(&self, station: StationId) -> bool {
        self.up.id() == station || self.down.id() == station
    }

    /// Returns what this segment becomes when `other` is inserted alongside it.
    ///
    /// `other` shares the `shared` endpoint with `self`. The non-shared end of
    /// `other` becomes the new boundary of `self`, and `self` loses
    /// `other.distance`:
    ///
    /// ```text
    /// shared Up:    A ---10--- B   +  A -4- C   =>   C -6- B
    /// shared Down:  A ---10--- B   +  C -4- B   =>   A -6- C
    /// ```
    ///
    /// This does not modify `self`, so a caller can check every split before
    /// committing any of them.
    pub fn split_against(&self, other: &Segment, shared: SharedEnd) -> Result<Segment, TopologyError> {
        let distance = self.distance.shortened_by(other.distance)?;
        let (up, down) = match shared {
            SharedEnd::Up => (other.down.clone(), self.down.clone()),
            SharedEnd::Down => (self.up.clone(), other.up.clone()),
        };
        Segment::with_distance(up, down, distance)
    }

    /// Joins this segment with the one that continues from its down station.
    pub fn merge(&self, next: &Segment) -> Result<Segment, TopologyError> {
        if self.down != next.up {
            return Err(TopologyError::BrokenChain("merged segments are not adjacent"));
        }
        let distance = self.distance.joined_with(next.distance)?;
        Segment::with_distance(self.up.clone(), next.down.clone(), distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(id: u64, name: &str) -> Station {
        Station::new(StationId(id), name)
    }

    fn seg(up: &Station, down: &Station, distance: i64) -> Segment {
        Segment::new(up.clone(), down.clone(), distance).unwrap()
    }

    #[test]
    fn new_rejects_non_positive_distance() {
        let (a, b) = (st(1, "A"), st(2, "B"));
        assert_eq!(
            Segment::new(a.clone(), b.clone(), 0),
            Err(TopologyError::InvalidDistance(0))
        );
        assert_eq!(
            Segment::new(a, b, -10),
            Err(TopologyError::InvalidDistance(-10))
        );
    }

    #[test]
    fn new_rejects_same_station() {
        let a = st(1, "A");
        assert_eq!(
            Segment::new(a.clone(), a, 5),
            Err(TopologyError::SameStation(StationId(1)))
        );
    }

    #[test]
    fn distance_checked_before_stations() {
        let a = st(1, "A");
        assert_eq!(
            Segment::new(a.clone(), a, 0),
            Err(TopologyError::InvalidDistance(0))
        );
    }

    #[test]
    fn endpoints_and_touches() {
        let (a, b, c) = (st(1, "A"), st(2, "B"), st(3, "C"));
        let s = seg(&a, &b, 3);
        assert_eq!(s.endpoints(), [&a, &b]);
        assert!(s.touches(a.id()));
        assert!(s.touches(b.id()));
        assert!(!s.touches(c.id()));
    }

    #[test]
    fn split_on_shared_up_end() {
        let (a, b, c) = (st(1, "A"), st(2, "B"), st(3, "C"));
        let existing = seg(&a, &b, 10);
        let inserted = seg(&a, &c, 4);

        let shortened = existing.split_against(&inserted, SharedEnd::Up).unwrap();

        assert_eq!(shortened.up(), &c);
        assert_eq!(shortened.down(), &b);
        assert_eq!(shortened.distance().get(), 6);
        // The original is untouched
        assert_eq!(existing.distance().get(), 10);
    }

    #[test]
    fn split_on_shared_down_end_uses_inserted_up_station() {
        // A --10-- B with C --4-- B inserted: the existing segment must end at C,
        // the inserted segment's up station. Taking the inserted down station
        // instead would leave A --6-- B and duplicate the B endpoint.
        let (a, b, c) = (st(1, "A"), st(2, "B"), st(3, "C"));
        let existing = seg(&a, &b, 10);
        let inserted = seg(&c, &b, 4);

        let shortened = existing.split_against(&inserted, SharedEnd::Down).unwrap();

        assert_eq!(shortened.up(), &a);
        assert_eq!(shortened.down(), &c);
        assert_eq!(shortened.distance().get(), 6);
    }

    #[test]
    fn split_rejects_equal_or_longer_distance() {
        let (a, b, c) = (st(1, "A"), st(2, "B"), st(3, "C"));
        let existing = seg(&a, &b, 10);

        for d in [10, 11, 100] {
            let inserted = seg(&a, &c, d);
            assert!(matches!(
                existing.split_against(&inserted, SharedEnd::Up),
                Err(TopologyError::DistanceTooLarge { existing: 10, .. })
            ));
        }
    }

    #[test]
    fn merge_adjacent_segments() {
        let (a, b, c) = (st(1, "A"), st(2, "B"), st(3, "C"));
        let merged = seg(&a, &b, 4).merge(&seg(&b, &c, 7)).unwrap();
        assert_eq!(merged, seg(&a, &c, 11));
    }

    #[test]
    fn merge_rejects_non_adjacent() {
        let (a, b, c, d) = (st(1, "A"), st(2, "B"), st(3, "C"), st(4, "D"));
        assert!(matches!(
            seg(&a, &b, 4).merge(&seg(&c, &d, 7)),
            Err(TopologyError::BrokenChain(_))
        ));
    }
}
