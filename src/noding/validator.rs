use geo_types::Coord;

use super::intersection_adder::find_intersections;
use super::NodedSegmentString;
use crate::error::{NodingError, Result};

/// Checks that a set of segment strings is fully noded: strings may meet
/// only at vertices of every segment involved.
pub struct NodingValidator<'a, D> {
    strings: &'a [NodedSegmentString<D>],
}

impl<'a, D> NodingValidator<'a, D> {
    pub fn new(strings: &'a [NodedSegmentString<D>]) -> Self {
        Self { strings }
    }

    /// Fails at the first point where a segment is touched or crossed
    /// away from its own endpoints, or overlapped collinearly.
    pub fn check_valid(&self) -> Result<()> {
        let coords: Vec<&[Coord<f64>]> = self.strings.iter().map(|s| s.coords()).collect();
        let adder = find_intersections(&coords);

        let mut bad: Option<Coord<f64>> = None;
        for ev in &adder.events {
            let seg = coords[ev.string];
            if ev.coord != seg[ev.segment] && ev.coord != seg[ev.segment + 1] {
                // Lowest point first, so the reported location does not
                // depend on event order.
                bad = match bad {
                    Some(b) if (b.x, b.y) <= (ev.coord.x, ev.coord.y) => Some(b),
                    _ => Some(ev.coord),
                };
            }
        }

        match bad {
            Some(p) => {
                log::debug!("noding is invalid at {:?}", p);
                Err(NodingError::InvalidNoding { x: p.x, y: p.y })
            }
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.check_valid().is_ok()
    }
}
