use geo_types::Coord;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::hot_pixel::HotPixelIndex;
use crate::algorithm::IntersectionStats;
use crate::error::{NodingError, Result};
use crate::noding::intersection_adder::{apply_events, find_intersections, NodeEvent};
use crate::noding::{split_all, Noder, NodedSegmentString};
use crate::precision::PrecisionModel;

/// Phase of a snap-rounding run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodingState {
    /// Strings carry only their boundary nodes.
    Initial,
    /// Exact intersections are being added as nodes.
    Finding,
    /// Nodes are being rounded to the grid.
    Rounding,
    /// Segments are re-tested against hot pixels until no node is added.
    Rescanning,
    /// Node lists are closed under rounding; substrings may be taken.
    Complete,
}

/// What happened during the last `compute_nodes` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapRoundingReport {
    /// Rescan passes run.
    pub passes: usize,
    /// Nodes added by each rescan pass, in order.
    pub nodes_added_per_pass: Vec<usize>,
    /// False if the pass ceiling was reached while nodes were still being added.
    pub converged: bool,
    pub interior_intersections: usize,
    pub hot_pixels: usize,
    /// Input strings that rounded to a single point and were dropped.
    pub collapsed_strings: usize,
    pub intersection_stats: IntersectionStats,
}

/// Iterated snap-rounding noder.
///
/// Intersections are found exactly, rounded to the precision grid, and every
/// segment is then re-noded at each hot pixel it passes through. Later passes
/// test the snapped fragments rather than the original segments, which
/// catches crossings created by the snapping itself. The loop ends when a
/// pass adds no node, or after `max_passes` passes; in the latter case the
/// best-effort result is kept and [`SnapRoundingReport::converged`] is false.
pub struct SnapRoundingNoder<D = ()> {
    precision: PrecisionModel,
    max_passes: usize,
    state: NodingState,
    strings: Option<Vec<NodedSegmentString<D>>>,
    report: SnapRoundingReport,
}

impl<D> SnapRoundingNoder<D> {
    pub const DEFAULT_MAX_PASSES: usize = 10;

    pub fn new(precision: PrecisionModel) -> Self {
        Self {
            precision,
            max_passes: Self::DEFAULT_MAX_PASSES,
            state: NodingState::Initial,
            strings: None,
            report: SnapRoundingReport::default(),
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Result<Self> {
        if max_passes == 0 {
            return Err(NodingError::InvalidConfiguration(
                "max_passes must be at least 1".to_string(),
            ));
        }
        self.max_passes = max_passes;
        Ok(self)
    }

    pub fn precision(&self) -> &PrecisionModel {
        &self.precision
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    pub fn state(&self) -> NodingState {
        self.state
    }

    pub fn report(&self) -> &SnapRoundingReport {
        &self.report
    }

    /// The strings of the last run with their node lists, before splitting.
    pub fn noded_strings(&self) -> Option<&[NodedSegmentString<D>]> {
        self.strings.as_deref()
    }

    /// Makes every vertex precise, removing repeated points. Strings that
    /// collapse to a point are dropped.
    fn round_vertices(&mut self, strings: Vec<NodedSegmentString<D>>) -> Vec<NodedSegmentString<D>> {
        if self.precision.is_floating() {
            return strings;
        }
        let mut out = Vec::with_capacity(strings.len());
        for ss in strings {
            let mut rounded: Vec<Coord<f64>> =
                ss.coords().iter().map(|c| self.precision.make_precise(*c)).collect();
            rounded.dedup();
            if rounded.as_slice() == ss.coords() {
                out.push(ss);
                continue;
            }
            let (_, data) = ss.into_parts();
            match NodedSegmentString::new(rounded, data) {
                Ok(r) => out.push(r),
                Err(_) => {
                    self.report.collapsed_strings += 1;
                    log::debug!("input string collapsed to a point under {:?}", self.precision);
                }
            }
        }
        out
    }

    fn find_interior_intersections(&mut self, strings: &mut [NodedSegmentString<D>]) {
        let adder = {
            let coords: Vec<&[Coord<f64>]> = strings.iter().map(|s| s.coords()).collect();
            find_intersections(&coords)
        };
        let added = apply_events(strings, &adder.events);
        self.report.interior_intersections = adder.interior_intersections;
        self.report.intersection_stats = adder.stats();
        log::debug!(
            "snap-rounding: {} interior intersections, {} nodes added",
            adder.interior_intersections,
            added
        );
        if adder.stats().ambiguous > 0 {
            log::warn!(
                "{} segment pairs had unresolvable orientation and were treated as disjoint",
                adder.stats().ambiguous
            );
        }
    }

    fn build_hot_pixels(&self, strings: &[NodedSegmentString<D>]) -> HotPixelIndex {
        let centres = strings.iter().flat_map(|s| {
            s.coords()
                .iter()
                .copied()
                .chain(s.node_list().iter().map(|n| n.coord))
        });
        HotPixelIndex::build(centres, &self.precision)
    }

    /// One rescan pass. The first pass tests the original segments, later
    /// passes the snapped fragments. Returns the number of nodes added.
    fn rescan(&self, strings: &mut [NodedSegmentString<D>], pixels: &HotPixelIndex, pass: usize) -> usize {
        let segments: Vec<Vec<(usize, Coord<f64>, Coord<f64>)>> = strings
            .iter()
            .map(|s| {
                if pass == 1 {
                    (0..s.segment_count())
                        .map(|i| (i, s.coords()[i], s.coords()[i + 1]))
                        .collect()
                } else {
                    s.fragments()
                        .into_iter()
                        .map(|f| (f.segment_index, f.start, f.end))
                        .collect()
                }
            })
            .collect();

        let snap_string = |(string, segs): (usize, &Vec<(usize, Coord<f64>, Coord<f64>)>)| {
            let mut events = Vec::new();
            for &(segment, p0, p1) in segs {
                for pixel in pixels.intersecting(p0, p1) {
                    events.push(NodeEvent {
                        string,
                        segment,
                        coord: pixel.centre(),
                    });
                }
            }
            events
        };

        #[cfg(feature = "parallel")]
        let events: Vec<NodeEvent> = segments
            .par_iter()
            .enumerate()
            .flat_map_iter(snap_string)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let events: Vec<NodeEvent> = segments
            .iter()
            .enumerate()
            .flat_map(snap_string)
            .collect();

        apply_events(strings, &events)
    }
}

impl<D: Clone> Noder<D> for SnapRoundingNoder<D> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString<D>>) -> Result<()> {
        self.report = SnapRoundingReport::default();
        self.strings = None;

        self.state = NodingState::Initial;
        let mut strings = self.round_vertices(strings);

        self.state = NodingState::Finding;
        self.find_interior_intersections(&mut strings);

        self.state = NodingState::Rounding;
        for ss in strings.iter_mut() {
            ss.round_nodes(&self.precision);
        }
        let pixels = self.build_hot_pixels(&strings);
        self.report.hot_pixels = pixels.len();

        self.state = NodingState::Rescanning;
        let mut converged = false;
        for pass in 1..=self.max_passes {
            let added = self.rescan(&mut strings, &pixels, pass);
            self.report.passes = pass;
            self.report.nodes_added_per_pass.push(added);
            log::debug!("snap-rounding pass {}: {} nodes added", pass, added);
            if added == 0 {
                converged = true;
                break;
            }
        }
        self.report.converged = converged;
        if !converged {
            log::warn!(
                "snap-rounding did not converge after {} passes; returning best-effort noding",
                self.max_passes
            );
        }

        self.state = NodingState::Complete;
        self.strings = Some(strings);
        Ok(())
    }

    fn noded_substrings(&mut self) -> Result<Vec<NodedSegmentString<D>>> {
        let strings = self.strings.take().ok_or(NodingError::NotComputed)?;
        Ok(split_all(strings))
    }
}

#[cfg(test)]
#[path = "snap_rounder_tests.rs"]
mod tests;
