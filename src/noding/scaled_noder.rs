use geo_types::Coord;

use super::snapround::SnapRoundingNoder;
use super::{Noder, NodedSegmentString};
use crate::error::{NodingError, Result};
use crate::precision::PrecisionModel;

/// Runs an inner noder on an integer grid.
///
/// Input coordinates are multiplied by `scale` and rounded to integers
/// before the inner noder sees them; the noded substrings are divided by
/// `scale` on the way out. The inner noder is expected to work at unit
/// precision.
///
/// Rounding to a coarse grid can merge distinct input vertices. Repeated
/// points are removed from the scaled copies and a copy left with a single
/// point is dropped; this is the effect of the chosen precision, not an
/// error.
pub struct ScaledNoder<N> {
    inner: N,
    scale: f64,
}

impl<N> ScaledNoder<N> {
    pub fn new(inner: N, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NodingError::InvalidScale(scale));
        }
        Ok(Self { inner, scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// True when the scale is one; coordinates are still rounded to
    /// integers but never multiplied or divided.
    pub fn is_integer_precision(&self) -> bool {
        self.scale == 1.0
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    pub fn into_inner(self) -> N {
        self.inner
    }

    fn scale_up<D>(&self, strings: Vec<NodedSegmentString<D>>) -> Vec<NodedSegmentString<D>> {
        let mut out = Vec::with_capacity(strings.len());
        for ss in strings {
            let (coords, data) = ss.into_parts();
            let mut scaled: Vec<Coord<f64>> = coords
                .iter()
                .map(|c| {
                    if self.is_integer_precision() {
                        Coord { x: c.x.round(), y: c.y.round() }
                    } else {
                        Coord {
                            x: (c.x * self.scale).round(),
                            y: (c.y * self.scale).round(),
                        }
                    }
                })
                .collect();
            scaled.dedup();
            match NodedSegmentString::new(scaled, data) {
                Ok(s) => out.push(s),
                Err(_) => log::debug!(
                    "dropping string starting at {:?}: collapses at scale {}",
                    coords[0],
                    self.scale
                ),
            }
        }
        out
    }

    fn scale_down<D>(&self, strings: Vec<NodedSegmentString<D>>) -> Result<Vec<NodedSegmentString<D>>> {
        strings
            .into_iter()
            .map(|ss| {
                let (coords, data) = ss.into_parts();
                let coords = coords
                    .into_iter()
                    .map(|c| Coord {
                        x: c.x / self.scale,
                        y: c.y / self.scale,
                    })
                    .collect();
                NodedSegmentString::new(coords, data)
            })
            .collect()
    }
}

impl<D> ScaledNoder<SnapRoundingNoder<D>> {
    /// Snap-rounding to a grid of spacing `1 / scale`.
    pub fn snap_rounding(scale: f64) -> Result<Self> {
        let unit = PrecisionModel::fixed(1.0)?;
        Self::new(SnapRoundingNoder::new(unit), scale)
    }
}

impl<D, N: Noder<D>> Noder<D> for ScaledNoder<N> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString<D>>) -> Result<()> {
        let scaled = self.scale_up(strings);
        self.inner.compute_nodes(scaled)
    }

    fn noded_substrings(&mut self) -> Result<Vec<NodedSegmentString<D>>> {
        let noded = self.inner.noded_substrings()?;
        if self.is_integer_precision() {
            return Ok(noded);
        }
        self.scale_down(noded)
    }
}
