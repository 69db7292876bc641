use geo_types::Coord;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::segment_string::NodedSegmentString;
use crate::algorithm::{IntersectionStats, LineIntersector, SegmentIntersection};
use crate::index::{ChainIndex, MonotoneChain};

/// A node to be added to segment `segment` of string `string`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeEvent {
    pub string: usize,
    pub segment: usize,
    pub coord: Coord<f64>,
}

/// Tests segment pairs and records the nodes they induce.
///
/// Nodes are collected as events rather than applied directly so candidate
/// pairs can be processed in any order (or in parallel) and applied in one
/// sequential step afterwards.
#[derive(Debug, Default)]
pub struct IntersectionAdder {
    li: LineIntersector,
    pub events: Vec<NodeEvent>,
    pub interior_intersections: usize,
}

impl IntersectionAdder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> IntersectionStats {
        self.li.stats
    }

    /// Processes segment `i` of string `s0` against segment `j` of `s1`.
    pub fn process(
        &mut self,
        s0: usize,
        coords0: &[Coord<f64>],
        i: usize,
        s1: usize,
        coords1: &[Coord<f64>],
        j: usize,
    ) {
        if s0 == s1 && i == j {
            return;
        }
        let a = (coords0[i], coords0[i + 1]);
        let b = (coords1[j], coords1[j + 1]);
        let result = self.li.compute(a.0, a.1, b.0, b.1);
        if !result.has_intersection() {
            return;
        }
        if s0 == s1 && is_trivial(&result, coords0, i, j) {
            return;
        }
        if result.is_interior_to(a) || result.is_interior_to(b) {
            self.interior_intersections += 1;
        }
        for p in result.points() {
            self.events.push(NodeEvent { string: s0, segment: i, coord: p });
            self.events.push(NodeEvent { string: s1, segment: j, coord: p });
        }
    }

    pub fn merge(&mut self, mut other: IntersectionAdder) {
        self.events.append(&mut other.events);
        self.interior_intersections += other.interior_intersections;
        self.li.stats.merge(&other.li.stats);
    }
}

/// Finds every intersection between (and within) the given coordinate
/// sequences using a monotone-chain index.
pub fn find_intersections(coords: &[&[Coord<f64>]]) -> IntersectionAdder {
    let index = ChainIndex::build(coords.iter().copied());
    let pairs = index.candidate_pairs();
    log::debug!("finding intersections: {} chains, {} candidate pairs", index.len(), pairs.len());

    let process_pair = |acc: &mut IntersectionAdder, a: &MonotoneChain, b: &MonotoneChain| {
        let ca = coords[a.string];
        let cb = coords[b.string];
        a.compute_overlaps(ca, b, cb, &mut |i, j| {
            acc.process(a.string, ca, i, b.string, cb, j);
        });
    };

    #[cfg(feature = "parallel")]
    let adder = pairs
        .par_iter()
        .fold(IntersectionAdder::new, |mut acc, &(a, b)| {
            process_pair(&mut acc, a, b);
            acc
        })
        .reduce(IntersectionAdder::new, |mut a, b| {
            a.merge(b);
            a
        });

    #[cfg(not(feature = "parallel"))]
    let adder = pairs
        .iter()
        .fold(IntersectionAdder::new(), |mut acc, &(a, b)| {
            process_pair(&mut acc, a, b);
            acc
        });

    adder
}

/// Applies node events to their strings. Returns how many nodes were new.
pub fn apply_events<D>(strings: &mut [NodedSegmentString<D>], events: &[NodeEvent]) -> usize {
    let mut added = 0;
    for ev in events {
        if strings[ev.string].add_node(ev.coord, ev.segment) {
            added += 1;
        }
    }
    added
}

/// Adjacent segments of one string always meet at their shared vertex; that
/// contact is not a node. The same holds for the first and last segment of a
/// closed ring.
fn is_trivial(result: &SegmentIntersection, coords: &[Coord<f64>], i: usize, j: usize) -> bool {
    let SegmentIntersection::Endpoint { point } = *result else {
        return false;
    };
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    if hi - lo == 1 {
        return point == coords[hi];
    }
    let last_segment = coords.len() - 2;
    let closed = coords.first() == coords.last();
    closed && lo == 0 && hi == last_segment && point == coords[0]
}
