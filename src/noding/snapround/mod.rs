//! Snap-rounding: nodes are rounded to a grid and segments are re-noded at
//! every grid cell ("hot pixel") they pass through, until nothing changes.

pub mod hot_pixel;
pub mod snap_rounder;

pub use hot_pixel::{HotPixel, HotPixelIndex};
pub use snap_rounder::{NodingState, SnapRoundingNoder, SnapRoundingReport};
