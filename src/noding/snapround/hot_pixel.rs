use std::collections::HashSet;

use float_next_after::NextAfter;
use geo::kernels::Orientation;
use geo_types::Coord;
use rstar::{RTree, RTreeObject, AABB};

use crate::algorithm::orientation;
use crate::precision::PrecisionModel;

/// Half the side of a pixel, in grid units.
const TOLERANCE: f64 = 0.5;

/// The grid cell around a rounded node or vertex.
///
/// Under a fixed precision model the pixel is the square of side `1 / scale`
/// centred on `centre`, closed on its bottom and left edges and open on its
/// top and right edges, so a segment running exactly along a shared pixel
/// boundary belongs to one pixel only. Under floating precision the pixel
/// degenerates to the centre point.
#[derive(Clone, Copy, Debug)]
pub struct HotPixel {
    centre: Coord<f64>,
    scale: Option<f64>,
    // Centre in grid units.
    hpx: f64,
    hpy: f64,
}

impl HotPixel {
    /// `centre` must already be precise in `precision`.
    pub fn new(centre: Coord<f64>, precision: &PrecisionModel) -> Self {
        let scale = precision.scale();
        let (hpx, hpy) = match scale {
            Some(s) => ((centre.x * s).round(), (centre.y * s).round()),
            None => (centre.x, centre.y),
        };
        Self { centre, scale, hpx, hpy }
    }

    pub fn centre(&self) -> Coord<f64> {
        self.centre
    }

    /// Pixel bounds in input coordinates, widened by one ulp on each side so
    /// the division by the scale can never shrink the box below the pixel.
    pub fn envelope(&self) -> AABB<[f64; 2]> {
        let (min, max) = match self.scale {
            Some(s) => (
                [(self.hpx - TOLERANCE) / s, (self.hpy - TOLERANCE) / s],
                [(self.hpx + TOLERANCE) / s, (self.hpy + TOLERANCE) / s],
            ),
            None => ([self.centre.x, self.centre.y], [self.centre.x, self.centre.y]),
        };
        AABB::from_corners(
            [min[0].next_after(f64::NEG_INFINITY), min[1].next_after(f64::NEG_INFINITY)],
            [max[0].next_after(f64::INFINITY), max[1].next_after(f64::INFINITY)],
        )
    }

    /// Whether segment `p0 -> p1` passes through this pixel.
    pub fn intersects(&self, p0: Coord<f64>, p1: Coord<f64>) -> bool {
        match self.scale {
            Some(s) => self.intersects_scaled(p0.x * s, p0.y * s, p1.x * s, p1.y * s),
            None => self.contains_on_segment(p0, p1),
        }
    }

    fn contains_on_segment(&self, p0: Coord<f64>, p1: Coord<f64>) -> bool {
        let c = self.centre;
        let in_env = c.x >= p0.x.min(p1.x)
            && c.x <= p0.x.max(p1.x)
            && c.y >= p0.y.min(p1.y)
            && c.y <= p0.y.max(p1.y);
        in_env && orientation(p0, p1, c) == Some(Orientation::Collinear)
    }

    fn intersects_scaled(&self, p0x: f64, p0y: f64, p1x: f64, p1y: f64) -> bool {
        // Orient the segment left to right.
        let (px, py, qx, qy) = if p0x > p1x {
            (p1x, p1y, p0x, p0y)
        } else {
            (p0x, p0y, p1x, p1y)
        };

        let maxx = self.hpx + TOLERANCE;
        if px.min(qx) >= maxx {
            return false;
        }
        let minx = self.hpx - TOLERANCE;
        if px.max(qx) < minx {
            return false;
        }
        let maxy = self.hpy + TOLERANCE;
        if py.min(qy) >= maxy {
            return false;
        }
        let miny = self.hpy - TOLERANCE;
        if py.max(qy) < miny {
            return false;
        }

        // Axis-parallel segments that reach here cross the pixel.
        if px == qx || py == qy {
            return true;
        }

        let p = Coord { x: px, y: py };
        let q = Coord { x: qx, y: qy };
        let side = |x: f64, y: f64| sign(orientation(p, q, Coord { x, y }));

        // A segment through the upper-left corner only counts if it leaves
        // through the bottom or left edge, i.e. it is heading down.
        let orient_ul = match side(minx, maxy) {
            Some(o) => o,
            None => return false,
        };
        if orient_ul == 0 {
            return py >= qy;
        }

        let orient_ur = match side(maxx, maxy) {
            Some(o) => o,
            None => return false,
        };
        if orient_ur == 0 {
            return py <= qy;
        }
        if orient_ul != orient_ur {
            return true;
        }

        let orient_ll = match side(minx, miny) {
            Some(o) => o,
            None => return false,
        };
        if orient_ll == 0 {
            return true;
        }
        if orient_ll != orient_ul {
            return true;
        }

        let orient_lr = match side(maxx, miny) {
            Some(o) => o,
            None => return false,
        };
        if orient_lr == 0 {
            return py >= qy;
        }
        orient_ll != orient_lr
    }
}

fn sign(o: Option<Orientation>) -> Option<i8> {
    o.map(|o| match o {
        Orientation::CounterClockwise => 1,
        Orientation::Clockwise => -1,
        Orientation::Collinear => 0,
    })
}

/// Bit-exact key of a pixel centre.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
struct PixelKey(u64, u64);

impl From<Coord<f64>> for PixelKey {
    fn from(c: Coord<f64>) -> Self {
        // +0.0 folds -0.0 into 0.0
        PixelKey((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
    }
}

#[derive(Clone, Copy, Debug)]
struct IndexedPixel {
    pixel: HotPixel,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPixel {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// The set of hot pixels of one noding run, indexed by envelope.
///
/// Centres are deduplicated: every coordinate that rounds to the same grid
/// point yields one pixel, whose centre is that grid point.
pub struct HotPixelIndex {
    tree: RTree<IndexedPixel>,
}

impl HotPixelIndex {
    pub fn build<I>(centres: I, precision: &PrecisionModel) -> Self
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let mut seen: HashSet<PixelKey> = HashSet::new();
        let mut pixels = Vec::new();
        for c in centres {
            let centre = precision.make_precise(c);
            if seen.insert(PixelKey::from(centre)) {
                let pixel = HotPixel::new(centre, precision);
                pixels.push(IndexedPixel {
                    envelope: pixel.envelope(),
                    pixel,
                });
            }
        }
        Self {
            tree: RTree::bulk_load(pixels),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Pixels the segment `p0 -> p1` passes through.
    pub fn intersecting(&self, p0: Coord<f64>, p1: Coord<f64>) -> Vec<HotPixel> {
        let envelope = AABB::from_corners([p0.x, p0.y], [p1.x, p1.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|ip| ip.pixel)
            .filter(|px| px.intersects(p0, p1))
            .collect()
    }
}
