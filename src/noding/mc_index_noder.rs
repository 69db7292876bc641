use geo_types::Coord;

use super::intersection_adder::{apply_events, find_intersections};
use super::{split_all, Noder, NodedSegmentString};
use crate::algorithm::IntersectionStats;
use crate::error::{NodingError, Result};

/// Exact noder: adds every intersection at its computed coordinate, with no
/// rounding. The result is fully noded only when the intersection points are
/// representable, so this is mainly useful for floating precision input.
pub struct McIndexNoder<D = ()> {
    strings: Option<Vec<NodedSegmentString<D>>>,
    interior_intersections: usize,
    stats: IntersectionStats,
}

impl<D> Default for McIndexNoder<D> {
    fn default() -> Self {
        Self {
            strings: None,
            interior_intersections: 0,
            stats: IntersectionStats::default(),
        }
    }
}

impl<D> McIndexNoder<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interior_intersection_count(&self) -> usize {
        self.interior_intersections
    }

    pub fn stats(&self) -> IntersectionStats {
        self.stats
    }
}

impl<D: Clone> Noder<D> for McIndexNoder<D> {
    fn compute_nodes(&mut self, mut strings: Vec<NodedSegmentString<D>>) -> Result<()> {
        let adder = {
            let coords: Vec<&[Coord<f64>]> = strings.iter().map(|s| s.coords()).collect();
            find_intersections(&coords)
        };
        let added = apply_events(&mut strings, &adder.events);
        log::debug!(
            "exact noding: {} strings, {} interior intersections, {} nodes added",
            strings.len(),
            adder.interior_intersections,
            added
        );
        if adder.stats().ambiguous > 0 {
            log::warn!(
                "{} segment pairs had unresolvable orientation and were treated as disjoint",
                adder.stats().ambiguous
            );
        }
        self.interior_intersections = adder.interior_intersections;
        self.stats = adder.stats();
        self.strings = Some(strings);
        Ok(())
    }

    fn noded_substrings(&mut self) -> Result<Vec<NodedSegmentString<D>>> {
        let strings = self.strings.take().ok_or(NodingError::NotComputed)?;
        Ok(split_all(strings))
    }
}
