use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodingError {
    #[error("Invalid scale factor: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Segment string needs at least 2 coordinates, got {0}")]
    TooFewPoints(usize),

    #[error("Noded substrings requested before compute_nodes")]
    NotComputed,

    #[error("Invalid noding: interior intersection at ({x}, {y})")]
    InvalidNoding { x: f64, y: f64 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T> = std::result::Result<T, NodingError>;
