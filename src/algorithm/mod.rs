pub mod line_intersector;
pub mod orientation;

pub use line_intersector::{IntersectionStats, LineIntersector, SegmentIntersection};
pub use orientation::orientation;
