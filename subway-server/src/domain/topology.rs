//! The segment collection of a single line.
//!
//! Segments live in an arena (`Vec<Segment>`) and are indexed twice: by the
//! station they leave from and by the station they arrive at. Because a valid
//! line is one simple path, each station appears at most once in each index,
//! which makes every adjacency query a single map lookup.

use std::collections::HashMap;

use super::{Distance, Segment, SharedEnd, Station, StationId, TopologyError};

/// Ordered-but-unindexed set of segments forming one line's path.
///
/// # Invariants
///
/// After every successful mutation:
/// - the segments form exactly one simple path
/// - each station leaves at most one segment and arrives at most one segment
/// - at least one segment is present (once the first has been added)
/// - the total length is at most [`Distance::MAX`], so any merge fits too
///
/// Mutations either succeed completely or return an error with the topology
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    segments: Vec<Segment>,
    by_up: HashMap<StationId, usize>,
    by_down: HashMap<StationId, usize>,
}

impl Topology {
    /// Creates an empty topology, ready for its first segment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a topology holding just its first segment.
    pub fn seeded(first: Segment) -> Self {
        let mut topology = Self::new();
        topology.push(first);
        topology
    }

    /// Rebuilds a topology from segments read back from storage.
    ///
    /// The segments may be in any order. Fails with
    /// [`TopologyError::BrokenChain`] unless they form one simple path.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Result<Self, TopologyError> {
        let mut topology = Self::new();
        for segment in segments {
            if topology.by_up.contains_key(&segment.up().id()) {
                return Err(TopologyError::BrokenChain("station leaves more than one segment"));
            }
            if topology.by_down.contains_key(&segment.down().id()) {
                return Err(TopologyError::BrokenChain("station ends more than one segment"));
            }
            topology.push(segment);
        }

        if topology.is_empty() {
            return Err(TopologyError::BrokenChain("line has no segments"));
        }
        topology.length_with(0)?;

        // Walking the path checks connectivity and rules out cycles.
        topology.ordered_segments()?;
        Ok(topology)
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if no segment has been added yet.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments in storage order (not path order).
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if `station` is an endpoint of any segment.
    pub fn contains_station(&self, station: StationId) -> bool {
        self.by_up.contains_key(&station) || self.by_down.contains_key(&station)
    }

    /// Returns the segment leaving `station`, if any.
    pub fn segment_from(&self, station: StationId) -> Option<&Segment> {
        self.by_up.get(&station).map(|&i| &self.segments[i])
    }

    /// Returns the segment arriving at `station`, if any.
    pub fn segment_to(&self, station: StationId) -> Option<&Segment> {
        self.by_down.get(&station).map(|&i| &self.segments[i])
    }

    /// Sum of all segment lengths.
    pub fn total_distance(&self) -> u64 {
        self.segments.iter().map(|s| s.distance().get()).sum()
    }

    /// Total length once `extra` is added, if it stays within [`Distance::MAX`].
    fn length_with(&self, extra: u64) -> Result<u64, TopologyError> {
        self.segments
            .iter()
            .try_fold(extra, |acc, s| acc.checked_add(s.distance().get()))
            .filter(|&total| total <= Distance::MAX.get())
            .ok_or(TopologyError::DistanceOverflow)
    }

    /// Adds a segment, splitting an existing one if the new station lands
    /// between two connected stations.
    ///
    /// The first segment of an empty topology is accepted unconditionally.
    /// After that, exactly one endpoint of `new` must already be on the line.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::BothStationsExist`] if both endpoints are on the line
    /// - [`TopologyError::NeitherStationExists`] if neither endpoint is
    /// - [`TopologyError::DistanceTooLarge`] if `new` does not fit inside the
    ///   segment it would split
    /// - [`TopologyError::DistanceOverflow`] if extending the line would take
    ///   its length past [`Distance::MAX`]
    pub fn add_segment(&mut self, new: Segment) -> Result<(), TopologyError> {
        if self.is_empty() {
            self.push(new);
            return Ok(());
        }

        let up = new.up().id();
        let down = new.down().id();
        match (self.contains_station(up), self.contains_station(down)) {
            (true, true) => return Err(TopologyError::BothStationsExist { up, down }),
            (false, false) => return Err(TopologyError::NeitherStationExists { up, down }),
            _ => {}
        }

        // Work out every split before touching anything.
        let mut splits = Vec::with_capacity(2);
        if let Some(&i) = self.by_up.get(&up) {
            splits.push((i, self.segments[i].split_against(&new, SharedEnd::Up)?));
        }
        if let Some(&i) = self.by_down.get(&down) {
            splits.push((i, self.segments[i].split_against(&new, SharedEnd::Down)?));
        }
        // Splits conserve the total; only extending a terminal adds length.
        if splits.is_empty() {
            self.length_with(new.distance().get())?;
        }

        for (i, shortened) in splits {
            self.replace(i, shortened);
        }
        self.push(new);
        Ok(())
    }

    /// Removes a station from the line.
    ///
    /// An interior station's two segments are merged into one spanning both;
    /// a terminal station's single segment is dropped.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::SingleSegmentRemaining`] if only one segment is left
    /// - [`TopologyError::StationNotOnLine`] if `station` is not an endpoint
    pub fn remove_station(&mut self, station: StationId) -> Result<(), TopologyError> {
        if self.segments.len() == 1 {
            return Err(TopologyError::SingleSegmentRemaining);
        }

        let prev = self.by_down.get(&station).copied();
        let next = self.by_up.get(&station).copied();

        match (prev, next) {
            (Some(p), Some(n)) => {
                let merged = self.segments[p].merge(&self.segments[n])?;
                // Detach the higher index first so the lower one stays valid.
                self.detach(p.max(n));
                self.detach(p.min(n));
                self.push(merged);
            }
            (Some(i), None) | (None, Some(i)) => {
                self.detach(i);
            }
            (None, None) => return Err(TopologyError::StationNotOnLine(station)),
        }
        Ok(())
    }

    /// Returns the segments in path order, from the first terminal to the last.
    ///
    /// Recomputed on every call.
    pub fn ordered_segments(&self) -> Result<Vec<&Segment>, TopologyError> {
        if self.segments.is_empty() {
            return Ok(Vec::new());
        }

        let start = self
            .segments
            .iter()
            .position(|s| !self.by_down.contains_key(&s.up().id()))
            .ok_or(TopologyError::BrokenChain("no terminal station"))?;

        let mut ordered = Vec::with_capacity(self.segments.len());
        let mut current = Some(start);
        while let Some(i) = current {
            if ordered.len() == self.segments.len() {
                return Err(TopologyError::BrokenChain("path revisits a segment"));
            }
            let segment = &self.segments[i];
            ordered.push(segment);
            current = self.by_up.get(&segment.down().id()).copied();
        }

        if ordered.len() != self.segments.len() {
            return Err(TopologyError::BrokenChain("segments unreachable from the first station"));
        }
        Ok(ordered)
    }

    /// Returns the stations in path order.
    ///
    /// The result has one more entry than there are segments.
    pub fn stations(&self) -> Result<Vec<Station>, TopologyError> {
        let ordered = self.ordered_segments()?;
        let Some(first) = ordered.first() else {
            return Ok(Vec::new());
        };

        let mut stations = Vec::with_capacity(ordered.len() + 1);
        stations.push(first.up().clone());
        stations.extend(ordered.iter().map(|s| s.down().clone()));
        Ok(stations)
    }

    fn push(&mut self, segment: Segment) {
        let i = self.segments.len();
        self.by_up.insert(segment.up().id(), i);
        self.by_down.insert(segment.down().id(), i);
        self.segments.push(segment);
    }

    fn replace(&mut self, i: usize, segment: Segment) {
        let old = &self.segments[i];
        self.by_up.remove(&old.up().id());
        self.by_down.remove(&old.down().id());
        self.by_up.insert(segment.up().id(), i);
        self.by_down.insert(segment.down().id(), i);
        self.segments[i] = segment;
    }

    fn detach(&mut self, i: usize) -> Segment {
        let removed = self.segments.swap_remove(i);
        self.by_up.remove(&removed.up().id());
        self.by_down.remove(&removed.down().id());

        // swap_remove moved the last segment into slot i.
        if let Some(moved) = self.segments.get(i) {
            self.by_up.insert(moved.up().id(), i);
            self.by_down.insert(moved.down().id(), i);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(id: u64) -> Station {
        let name = ["A", "B", "C", "D", "E", "F"][(id - 1) as usize];
        Station::new(StationId(id), name)
    }

    fn seg(up: u64, down: u64, distance: i64) -> Segment {
        Segment::new(st(up), st(down), distance).unwrap()
    }

    fn names(t: &Topology) -> Vec<String> {
        t.stations()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    fn distances(t: &Topology) -> Vec<u64> {
        t.ordered_segments()
            .unwrap()
            .iter()
            .map(|s| s.distance().get())
            .collect()
    }

    /// A --10-- B
    fn a_b() -> Topology {
        let mut t = Topology::new();
        t.add_segment(seg(1, 2, 10)).unwrap();
        t
    }

    /// A --3-- B --4-- C --5-- D
    fn a_b_c_d() -> Topology {
        let mut t = Topology::new();
        t.add_segment(seg(1, 2, 3)).unwrap();
        t.add_segment(seg(2, 3, 4)).unwrap();
        t.add_segment(seg(3, 4, 5)).unwrap();
        t
    }

    #[test]
    fn empty_topology_has_no_stations() {
        let t = Topology::new();
        assert!(t.is_empty());
        assert!(t.stations().unwrap().is_empty());
        assert_eq!(t.total_distance(), 0);
    }

    #[test]
    fn first_segment_is_accepted_unconditionally() {
        let t = a_b();
        assert_eq!(t.len(), 1);
        assert_eq!(names(&t), ["A", "B"]);
    }

    #[test]
    fn insert_between_on_shared_up_station() {
        let mut t = a_b();
        t.add_segment(seg(1, 3, 4)).unwrap();

        assert_eq!(names(&t), ["A", "C", "B"]);
        assert_eq!(distances(&t), [4, 6]);
    }

    #[test]
    fn insert_between_on_shared_down_station() {
        let mut t = a_b();
        t.add_segment(seg(3, 2, 4)).unwrap();

        assert_eq!(names(&t), ["A", "C", "B"]);
        assert_eq!(distances(&t), [6, 4]);
    }

    #[test]
    fn prepend_before_first_station() {
        let mut t = a_b();
        t.add_segment(seg(4, 1, 3)).unwrap();

        assert_eq!(names(&t), ["D", "A", "B"]);
        assert_eq!(distances(&t), [3, 10]);
    }

    #[test]
    fn append_after_last_station() {
        let mut t = a_b();
        t.add_segment(seg(2, 3, 30)).unwrap();

        assert_eq!(names(&t), ["A", "B", "C"]);
        assert_eq!(distances(&t), [10, 30]);
    }

    #[test]
    fn insert_between_rejects_distance_not_shorter() {
        for d in [10, 11] {
            let mut t = a_b();
            let err = t.add_segment(seg(1, 3, d)).unwrap_err();
            assert_eq!(
                err,
                TopologyError::DistanceTooLarge {
                    existing: 10,
                    requested: d as u64
                }
            );
            // Nothing changed
            assert_eq!(names(&t), ["A", "B"]);
            assert_eq!(distances(&t), [10]);
        }
    }

    #[test]
    fn rejects_both_stations_present() {
        let mut t = a_b_c_d();
        assert_eq!(
            t.add_segment(seg(1, 3, 1)),
            Err(TopologyError::BothStationsExist {
                up: StationId(1),
                down: StationId(3)
            })
        );
        // Reversed existing pair
        assert!(matches!(
            t.add_segment(seg(2, 1, 1)),
            Err(TopologyError::BothStationsExist { .. })
        ));
        assert_eq!(names(&t), ["A", "B", "C", "D"]);
    }

    #[test]
    fn rejects_neither_station_present() {
        let mut t = a_b();
        assert_eq!(
            t.add_segment(seg(5, 6, 1)),
            Err(TopologyError::NeitherStationExists {
                up: StationId(5),
                down: StationId(6)
            })
        );
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn long_segment_elsewhere_does_not_block_insert() {
        // Only the segment being split is compared against the new distance.
        let mut t = a_b_c_d();
        t.add_segment(seg(4, 5, 100)).unwrap();
        assert_eq!(names(&t), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn split_interior_segment() {
        let mut t = a_b_c_d();
        t.add_segment(seg(2, 5, 1)).unwrap();
        assert_eq!(names(&t), ["A", "B", "E", "C", "D"]);
        assert_eq!(distances(&t), [3, 1, 3, 5]);
    }

    #[test]
    fn remove_interior_station_merges() {
        let mut t = a_b_c_d();
        t.remove_station(StationId(2)).unwrap();

        assert_eq!(names(&t), ["A", "C", "D"]);
        assert_eq!(distances(&t), [7, 5]);
        assert_eq!(t.total_distance(), 12);
    }

    #[test]
    fn remove_first_terminal() {
        let mut t = Topology::new();
        t.add_segment(seg(1, 2, 3)).unwrap();
        t.add_segment(seg(2, 3, 4)).unwrap();

        t.remove_station(StationId(1)).unwrap();
        assert_eq!(names(&t), ["B", "C"]);
        assert_eq!(t.total_distance(), 4);
    }

    #[test]
    fn remove_last_terminal() {
        let mut t = a_b_c_d();
        t.remove_station(StationId(4)).unwrap();
        assert_eq!(names(&t), ["A", "B", "C"]);
        assert_eq!(t.total_distance(), 7);
    }

    #[test]
    fn remove_from_single_segment_always_fails() {
        let mut t = a_b();
        for id in [1, 2, 99] {
            assert_eq!(
                t.remove_station(StationId(id)),
                Err(TopologyError::SingleSegmentRemaining)
            );
        }
        assert_eq!(names(&t), ["A", "B"]);
    }

    #[test]
    fn remove_unknown_station() {
        let mut t = a_b_c_d();
        assert_eq!(
            t.remove_station(StationId(6)),
            Err(TopologyError::StationNotOnLine(StationId(6)))
        );
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn indexes_survive_repeated_removal() {
        let mut t = a_b_c_d();
        t.add_segment(seg(4, 5, 2)).unwrap();
        t.remove_station(StationId(3)).unwrap();
        t.remove_station(StationId(1)).unwrap();
        t.remove_station(StationId(4)).unwrap();

        assert_eq!(names(&t), ["B", "E"]);
        assert_eq!(distances(&t), [11]);
        assert!(t.segment_from(StationId(2)).is_some());
        assert!(t.segment_to(StationId(5)).is_some());
        assert!(!t.contains_station(StationId(1)));
    }

    #[test]
    fn from_segments_accepts_any_order() {
        let t = Topology::from_segments([seg(3, 4, 5), seg(1, 2, 3), seg(2, 3, 4)]).unwrap();
        assert_eq!(names(&t), ["A", "B", "C", "D"]);
    }

    #[test]
    fn from_segments_rejects_broken_paths() {
        // Empty
        assert!(matches!(
            Topology::from_segments(Vec::new()),
            Err(TopologyError::BrokenChain(_))
        ));
        // Fork
        assert!(matches!(
            Topology::from_segments([seg(1, 2, 1), seg(1, 3, 1)]),
            Err(TopologyError::BrokenChain(_))
        ));
        // Merge
        assert!(matches!(
            Topology::from_segments([seg(1, 3, 1), seg(2, 3, 1)]),
            Err(TopologyError::BrokenChain(_))
        ));
        // Disconnected
        assert!(matches!(
            Topology::from_segments([seg(1, 2, 1), seg(3, 4, 1)]),
            Err(TopologyError::BrokenChain(_))
        ));
        // Cycle
        assert!(matches!(
            Topology::from_segments([seg(1, 2, 1), seg(2, 1, 1)]),
            Err(TopologyError::BrokenChain(_))
        ));
        // Path plus a detached cycle
        assert!(matches!(
            Topology::from_segments([seg(1, 2, 1), seg(3, 4, 1), seg(4, 3, 1)]),
            Err(TopologyError::BrokenChain(_))
        ));
    }

    #[test]
    fn line_length_is_capped() {
        let mut t = Topology::new();
        t.add_segment(seg(1, 2, i64::MAX - 1)).unwrap();
        t.add_segment(seg(2, 3, 1)).unwrap();
        assert_eq!(t.total_distance(), Distance::MAX.get());

        // Extending either end would go past the cap
        assert_eq!(t.add_segment(seg(3, 4, 1)), Err(TopologyError::DistanceOverflow));
        assert_eq!(t.add_segment(seg(4, 1, 1)), Err(TopologyError::DistanceOverflow));
        assert_eq!(names(&t), ["A", "B", "C"]);

        // Splitting keeps the total, so it is still allowed
        t.add_segment(seg(1, 4, 5)).unwrap();
        assert_eq!(t.total_distance(), Distance::MAX.get());

        // Merging everything back down fits in one segment
        t.remove_station(StationId(4)).unwrap();
        t.remove_station(StationId(2)).unwrap();
        assert_eq!(distances(&t), [Distance::MAX.get()]);
    }

    #[test]
    fn from_segments_rejects_overlong_line() {
        let result = Topology::from_segments([seg(1, 2, i64::MAX), seg(2, 3, 1)]);
        assert_eq!(result.err(), Some(TopologyError::DistanceOverflow));
    }
}
