use std::fmt;

/// Precondition violations reported by the scanline and raster stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// A row produced more intersections than its storage was sized for.
    CapacityExceeded { row: usize, capacity: usize },
    /// The pixel buffer does not hold `width * height` pixels.
    BufferSize { expected: usize, actual: usize },
    /// Fewer scanlines than rows to rasterize.
    MissingScanlines { expected: usize, actual: usize },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::CapacityExceeded { row, capacity } => {
                write!(f, "scanline {row} exceeded its capacity of {capacity} intersections")
            }
            RasterError::BufferSize { expected, actual } => {
                write!(f, "pixel buffer holds {actual} pixels, expected {expected}")
            }
            RasterError::MissingScanlines { expected, actual } => {
                write!(f, "{actual} scanlines supplied for {expected} rows")
            }
        }
    }
}

impl std::error::Error for RasterError {}
