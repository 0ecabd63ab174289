//! Coefficient producers for the vector generator.
//!
//! Filter design is not part of the conformance contract: the generator only
//! needs *some* `(b, a)` pair through the [`FilterDesign`](crate::traits::FilterDesign)
//! seam. A digital Butterworth low-pass is bundled so the `generate` tool works
//! on its own.

mod butterworth;
mod relative_degree;

pub use butterworth::{ButterConfig, ButterKernel, Butterworth};

/// Transfer function coefficients in `(b, a)` form, double precision.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignedFilter {
    /// Numerator coefficients.
    pub b: Vec<f64>,
    /// Denominator coefficients.
    pub a: Vec<f64>,
}

impl DesignedFilter {
    /// Filter order, `len(a) - 1`.
    pub fn order(&self) -> usize {
        self.a.len().saturating_sub(1)
    }
}
