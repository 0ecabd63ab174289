//! Digital Butterworth low-pass design.
//!
//! Analog prototype poles on the unit circle, scaled to the pre-warped
//! cutoff, mapped with the bilinear transform and expanded into polynomial
//! form. Matches `scipy.signal.butter(order, cutoff)` to rounding.

use core::f64::consts::PI;

use nalgebra::Complex;

use super::relative_degree::relative_degree;
use super::DesignedFilter;
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle};
use crate::traits::FilterDesign;

/// Sample rate the cutoff is normalized against (Nyquist = 1).
const FS: f64 = 2.0;

/// Constructor config for [`ButterKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterConfig {
    /// Filter order; the design has `order + 1` coefficients.
    pub order: usize,
    /// Cutoff frequency normalized to Nyquist, in `(0, 1)`.
    pub cutoff: f64,
}

/// Validated Butterworth low-pass design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterKernel {
    order: usize,
    cutoff: f64,
}

impl KernelLifecycle for ButterKernel {
    type Config = ButterConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !(config.cutoff > 0.0 && config.cutoff < 1.0) {
            return Err(ConfigError::InvalidArgument {
                arg: "cutoff",
                reason: "cutoff must lie strictly between 0 and 1 (Nyquist)",
            });
        }
        Ok(Self {
            order: config.order,
            cutoff: config.cutoff,
        })
    }
}

impl ButterKernel {
    /// Compute `(b, a)`.
    pub fn run_alloc(&self) -> Result<DesignedFilter, ExecInvariantViolation> {
        let n = self.order;

        // Analog prototype: no zeros, poles evenly spaced on the left half circle.
        let zeros: Vec<Complex<f64>> = Vec::new();
        let poles: Vec<Complex<f64>> = (0..n)
            .map(|k| {
                let m = 2.0 * k as f64 - n as f64 + 1.0;
                -Complex::from_polar(1.0, PI * m / (2.0 * n as f64))
            })
            .collect();

        // Low-pass to low-pass at the pre-warped cutoff.
        let warped = 2.0 * FS * (PI * self.cutoff / FS).tan();
        let degree = relative_degree(&zeros, &poles)?;
        let zeros: Vec<_> = zeros.iter().map(|&z| z * warped).collect();
        let poles: Vec<_> = poles.iter().map(|&p| p * warped).collect();
        let gain = warped.powi(degree as i32);

        // Bilinear transform; the zeros at infinity land on z = -1.
        let fs2 = Complex::new(2.0 * FS, 0.0);
        let zeros_z: Vec<_> = zeros
            .iter()
            .map(|&z| (fs2 + z) / (fs2 - z))
            .chain(core::iter::repeat(Complex::new(-1.0, 0.0)).take(degree))
            .collect();
        let poles_z: Vec<_> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
        let num: Complex<f64> = zeros.iter().map(|&z| fs2 - z).product();
        let den: Complex<f64> = poles.iter().map(|&p| fs2 - p).product();
        let gain_z = gain * (num / den).re;

        let b: Vec<f64> = poly(&zeros_z).iter().map(|c| c.re * gain_z).collect();
        let a: Vec<f64> = poly(&poles_z).iter().map(|c| c.re).collect();
        if b.iter().chain(&a).any(|c| !c.is_finite()) {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "butterworth design produced non-finite coefficients",
            });
        }
        Ok(DesignedFilter { b, a })
    }
}

/// Zero-sized collaborator building a [`ButterKernel`] per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Butterworth;

impl FilterDesign for Butterworth {
    fn design(&self, order: usize, param: f64) -> Result<DesignedFilter, ExecInvariantViolation> {
        ButterKernel::try_new(ButterConfig {
            order,
            cutoff: param,
        })?
        .run_alloc()
    }
}

/// Monic polynomial with the given roots, highest power first.
fn poly(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &r in roots {
        let mut next = coeffs.clone();
        next.push(Complex::new(0.0, 0.0));
        for (i, &c) in coeffs.iter().enumerate() {
            next[i + 1] -= r * c;
        }
        coeffs = next;
    }
    coeffs
}
