use geo_types::Coord;
use rstar::{Envelope, RTreeObject, AABB};

/// A run of segments of one segment string along which both x and y are
/// monotone. Because of that, the envelope of any sub-run is the envelope of
/// its two end vertices, which makes bisection cheap.
#[derive(Clone, Debug)]
pub struct MonotoneChain {
    /// Unique id within one index; used to visit each pair once.
    pub id: usize,
    /// Index of the owning segment string.
    pub string: usize,
    /// First vertex of the chain.
    pub start: usize,
    /// Last vertex of the chain (inclusive). Segments are `start..end`.
    pub end: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for MonotoneChain {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl MonotoneChain {
    pub fn new(id: usize, string: usize, coords: &[Coord<f64>], start: usize, end: usize) -> Self {
        Self {
            id,
            string,
            start,
            end,
            envelope: section_envelope(coords, start, end),
        }
    }

    /// Calls `action(i, j)` for every segment `i` of this chain and `j` of
    /// `other` whose envelopes may overlap.
    pub fn compute_overlaps<F>(
        &self,
        coords: &[Coord<f64>],
        other: &MonotoneChain,
        other_coords: &[Coord<f64>],
        action: &mut F,
    ) where
        F: FnMut(usize, usize),
    {
        overlaps_section(
            coords,
            self.start,
            self.end,
            other_coords,
            other.start,
            other.end,
            action,
        );
    }
}

fn overlaps_section<F>(
    coords0: &[Coord<f64>],
    start0: usize,
    end0: usize,
    coords1: &[Coord<f64>],
    start1: usize,
    end1: usize,
    action: &mut F,
) where
    F: FnMut(usize, usize),
{
    if end0 - start0 == 1 && end1 - start1 == 1 {
        action(start0, start1);
        return;
    }

    let env0 = section_envelope(coords0, start0, end0);
    let env1 = section_envelope(coords1, start1, end1);
    if !env0.intersects(&env1) {
        return;
    }

    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;

    if start0 < mid0 {
        if start1 < mid1 {
            overlaps_section(coords0, start0, mid0, coords1, start1, mid1, action);
        }
        if mid1 < end1 {
            overlaps_section(coords0, start0, mid0, coords1, mid1, end1, action);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            overlaps_section(coords0, mid0, end0, coords1, start1, mid1, action);
        }
        if mid1 < end1 {
            overlaps_section(coords0, mid0, end0, coords1, mid1, end1, action);
        }
    }
}

fn section_envelope(coords: &[Coord<f64>], start: usize, end: usize) -> AABB<[f64; 2]> {
    let a = coords[start];
    let b = coords[end];
    AABB::from_corners([a.x, a.y], [b.x, b.y])
}

/// Quadrant of the direction `p0 -> p1`, or `None` for a zero-length segment.
fn quadrant(p0: Coord<f64>, p1: Coord<f64>) -> Option<u8> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(match (dx >= 0.0, dy >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    })
}

/// Splits `coords` into maximal monotone runs, returned as inclusive vertex
/// ranges `(start, end)`. Consecutive runs share their boundary vertex.
/// Zero-length segments never start a new run.
pub fn monotone_chain_ranges(coords: &[Coord<f64>]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    if coords.len() < 2 {
        return ranges;
    }

    let last = coords.len() - 1;
    let mut start = 0;
    while start < last {
        let mut chain_quad = None;
        let mut end = start + 1;
        while end <= last {
            if let Some(q) = quadrant(coords[end - 1], coords[end]) {
                match chain_quad {
                    None => chain_quad = Some(q),
                    Some(cq) if cq != q => break,
                    Some(_) => {}
                }
            }
            end += 1;
        }
        // `end` overshoots by one: either the breaking vertex or past the last.
        let chain_end = end - 1;
        ranges.push((start, chain_end));
        start = chain_end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn test_single_segment_is_one_chain() {
        let pts = coords(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(monotone_chain_ranges(&pts), vec![(0, 1)]);
    }

    #[test]
    fn test_chains_break_on_quadrant_change() {
        // Up-right, up-right, down-right, down-left
        let pts = coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 3.0), (3.0, 0.0), (1.0, -2.0)]);
        assert_eq!(monotone_chain_ranges(&pts), vec![(0, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_zero_length_segment_continues_chain() {
        let pts = coords(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(monotone_chain_ranges(&pts), vec![(0, 3)]);
    }

    #[test]
    fn test_scenario_edge() {
        let pts = coords(&[(0.0, 0.0), (10.0, 0.0), (5.0, 5.0), (5.0, -5.0)]);
        assert_eq!(monotone_chain_ranges(&pts), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_compute_overlaps_finds_crossing_segments() {
        let a = coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let b = coords(&[(0.0, 4.0), (1.0, 3.0), (2.0, 2.5), (3.0, 2.0), (4.0, 0.0)]);
        let ca = MonotoneChain::new(0, 0, &a, 0, 4);
        let cb = MonotoneChain::new(1, 1, &b, 0, 4);

        let mut pairs = Vec::new();
        ca.compute_overlaps(&a, &cb, &b, &mut |i, j| pairs.push((i, j)));
        // The crossing lies between (2,2)-(3,3) and (2,2.5)-(3,2).
        assert!(pairs.contains(&(2, 2)));
        // Far-apart sections are pruned.
        assert!(!pairs.contains(&(0, 0)));
    }
}
