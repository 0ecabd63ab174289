//! Trait interfaces for filtering and filter-design capabilities.

use crate::design::DesignedFilter;
use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};

/// 1D recursive (IIR) filtering capability.
pub trait RecursiveFilter1D<T> {
    /// Run the filter into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run the filter and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Coefficient producer used by the vector generator.
///
/// `order` is the filter order (one less than the number of coefficients),
/// `param` is collaborator specific; for the bundled Butterworth design it is
/// the cutoff normalized to Nyquist.
pub trait FilterDesign {
    /// Produce numerator and denominator coefficients, `order + 1` of each.
    fn design(&self, order: usize, param: f64) -> Result<DesignedFilter, ExecInvariantViolation>;
}

impl<F> FilterDesign for F
where
    F: Fn(usize, f64) -> Result<DesignedFilter, ExecInvariantViolation>,
{
    fn design(&self, order: usize, param: f64) -> Result<DesignedFilter, ExecInvariantViolation> {
        self(order, param)
    }
}
