use geo_types::Coord;

use crate::error::{NodingError, Result};

/// Rounding policy applied to coordinates during noding.
///
/// `Fixed` snaps values to a grid with spacing `1 / scale`. Rounding is
/// half away from zero, the same rule `f64::round` uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrecisionModel {
    Floating,
    Fixed { scale: f64 },
}

impl Default for PrecisionModel {
    fn default() -> Self {
        PrecisionModel::Floating
    }
}

impl PrecisionModel {
    pub fn fixed(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NodingError::InvalidScale(scale));
        }
        Ok(PrecisionModel::Fixed { scale })
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, PrecisionModel::Floating)
    }

    /// Returns the scale factor, or `None` for floating precision.
    pub fn scale(&self) -> Option<f64> {
        match *self {
            PrecisionModel::Floating => None,
            PrecisionModel::Fixed { scale } => Some(scale),
        }
    }

    /// Width of one grid cell. Zero for floating precision.
    pub fn grid_size(&self) -> f64 {
        match *self {
            PrecisionModel::Floating => 0.0,
            PrecisionModel::Fixed { scale } => 1.0 / scale,
        }
    }

    pub fn make_precise_value(&self, v: f64) -> f64 {
        match *self {
            PrecisionModel::Floating => v,
            // Dividing by a fractional scale loses exactness (3.0 / 0.01), so
            // coarse grids multiply by the grid size instead.
            PrecisionModel::Fixed { scale } if scale < 1.0 => (v * scale).round() * (1.0 / scale),
            PrecisionModel::Fixed { scale } => (v * scale).round() / scale,
        }
    }

    pub fn make_precise(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.make_precise_value(c.x),
            y: self.make_precise_value(c.y),
        }
    }
}
