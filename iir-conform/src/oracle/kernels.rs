//! Kernel wrapper over [`apply`](super::apply).

use iir_conform_core::Sample;

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::traits::RecursiveFilter1D;

/// Constructor config for [`OracleKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig<S> {
    /// Denominator (feedback) coefficients.
    pub a: Vec<S>,
    /// Numerator (feed-forward) coefficients.
    pub b: Vec<S>,
}

/// Validated oracle with owned coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleKernel<S> {
    a: Vec<S>,
    b: Vec<S>,
}

impl<S: Sample> OracleKernel<S> {
    /// Denominator coefficients.
    pub fn a(&self) -> &[S] {
        &self.a
    }

    /// Numerator coefficients.
    pub fn b(&self) -> &[S] {
        &self.b
    }
}

impl<S: Sample> KernelLifecycle for OracleKernel<S> {
    type Config = OracleConfig<S>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.a.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "a" });
        }
        if config.b.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "b" });
        }
        if config.a.len() != config.b.len() {
            return Err(ConfigError::LengthMismatch {
                arg: "b",
                expected: config.a.len(),
                got: config.b.len(),
            });
        }
        if config.a[0].is_zero() {
            return Err(ConfigError::InvalidArgument {
                arg: "a",
                reason: "first element of a must not be zero",
            });
        }
        Ok(Self {
            a: config.a,
            b: config.b,
        })
    }
}

impl<S: Sample> RecursiveFilter1D<S> for OracleKernel<S> {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<S> + ?Sized,
        O: Write1D<S> + ?Sized,
    {
        let y = self.run_alloc(input)?;
        let out_slice = out
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if out_slice.len() != y.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: y.len(),
                got: out_slice.len(),
            });
        }
        out_slice.copy_from_slice(&y);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<S>, ExecInvariantViolation>
    where
        I: Read1D<S> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        Ok(super::apply(&self.a, &self.b, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn kernel() -> OracleKernel<f64> {
        OracleKernel::try_new(OracleConfig {
            a: vec![1.0, -0.5],
            b: vec![1.0, 0.0],
        })
        .expect("valid config")
    }

    #[test]
    fn rejects_invalid_configs() {
        let empty = OracleKernel::<f32>::try_new(OracleConfig {
            a: vec![],
            b: vec![1.0],
        });
        assert_eq!(empty.unwrap_err(), ConfigError::EmptyInput { arg: "a" });

        let mismatch = OracleKernel::<f32>::try_new(OracleConfig {
            a: vec![1.0, 0.0],
            b: vec![1.0],
        });
        assert_eq!(
            mismatch.unwrap_err(),
            ConfigError::LengthMismatch {
                arg: "b",
                expected: 2,
                got: 1
            }
        );

        let zero = OracleKernel::<f64>::try_new(OracleConfig {
            a: vec![0.0, 1.0],
            b: vec![1.0, 0.0],
        });
        assert!(matches!(
            zero.unwrap_err(),
            ConfigError::InvalidArgument { arg: "a", .. }
        ));
    }

    #[test]
    fn run_into_checks_output_length() {
        let k = kernel();
        let mut out = vec![0.0; 2];
        let err = k.run_into(&[1.0, 0.0, 0.0][..], &mut out).unwrap_err();
        assert_eq!(
            err,
            ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn runs_on_ndarray_buffers() {
        let k = kernel();
        let x = Array1::from(vec![1.0, 0.0, 0.0]);
        let mut out = Array1::zeros(3);
        k.run_into(&x, &mut out).expect("contiguous buffers");
        assert_eq!(out.to_vec(), vec![1.0, 0.5, 0.25]);
        assert_eq!(k.run_alloc(&x).expect("alloc"), out.to_vec());
    }
}
