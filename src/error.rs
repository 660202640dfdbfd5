use thiserror::Error;

/// Errors reported by the noding engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodingError {
    /// The snap-rounding grid scale factor must be finite and positive.
    /// Invalid values are rejected, never clamped.
    #[error("invalid snap-rounding scale factor: {0}")]
    InvalidScaleFactor(f64),

    /// The noding post-condition does not hold: two output segments
    /// still intersect away from their endpoints. This indicates a
    /// defect in the noding pipeline, not bad input data.
    #[error("interior intersection between noded segments at ({x}, {y})")]
    NotNoded { x: f64, y: f64 },
}

/// Convenience alias for results using [`NodingError`].
pub type Result<T> = std::result::Result<T, NodingError>;
