//! Coherent noise sources, used to create organically wandering modulation values.

mod simplex;
pub use simplex::SimplexNoise;

// -------------------------------------------------------------------------------------------------

/// A smooth, deterministic pseudo-random function of two continuous coordinates.
///
/// Implementations must return the same value for the same input coordinates for the
/// entire lifetime of the source.
pub trait NoiseSource: Send + Sync {
    /// Sample the noise field at the given position. Returns values in range `[-1, 1]`.
    fn sample(&self, x: f64, y: f64) -> f64;
}
