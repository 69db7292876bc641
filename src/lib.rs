pub mod algorithm;
pub mod error;
pub mod index;
pub mod noding;
pub mod precision;
pub mod wasm;

pub use error::{NodingError, Result};
pub use noding::extract::{extract_segment_strings, to_multi_line_string};
pub use noding::snapround::NodingState;
pub use noding::{
    McIndexNoder, NodedSegmentString, Noder, NodingValidator, ScaledNoder, SnapRoundingNoder,
    SnapRoundingReport,
};
pub use precision::PrecisionModel;
