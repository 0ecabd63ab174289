//! Test vectors and their persisted forms.
//!
//! A fixture carries filter coefficients, an input signal and an output
//! signal. The binary form is lossless; the text form keeps ten fractional
//! digits per value and is meant for humans and for seeding candidates.

mod binary;
mod text;

use std::path::Path;

use iir_conform_core::{Error, Result, Sample, SampleType};

use crate::kernel::{KernelLifecycle, Read1D};
use crate::oracle::{OracleConfig, OracleKernel};
use crate::traits::RecursiveFilter1D;

pub use binary::{decode, encode, read, write};
pub use text::{parse_text, read_text, render_text, write_text, FRACTION_DIGITS};

/// One conformance case in a single precision.
///
/// Built once, never mutated; derived vectors are new values.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorData<S> {
    a: Vec<S>,
    b: Vec<S>,
    inputs: Vec<S>,
    outputs: Vec<S>,
}

impl<S: Sample> VectorData<S> {
    /// Validate lengths and build a vector.
    pub fn new(a: Vec<S>, b: Vec<S>, inputs: Vec<S>, outputs: Vec<S>) -> Result<Self> {
        if a.is_empty() {
            return Err(Error::validation(
                "n_coefs",
                "at least one coefficient is required",
            ));
        }
        if a.len() != b.len() {
            return Err(Error::validation(
                "b_coefs",
                format!("expected {} coefficients, got {}", a.len(), b.len()),
            ));
        }
        if inputs.len() != outputs.len() {
            return Err(Error::validation(
                "outputs",
                format!("expected {} samples, got {}", inputs.len(), outputs.len()),
            ));
        }
        Ok(Self {
            a,
            b,
            inputs,
            outputs,
        })
    }

    /// Build a vector whose outputs are computed by the oracle.
    pub fn with_oracle_outputs(a: Vec<S>, b: Vec<S>, inputs: Vec<S>) -> Result<Self> {
        let kernel = OracleKernel::validated(OracleConfig { a, b })?;
        let outputs = kernel.run_alloc(inputs.as_slice())?;
        Self::new(kernel.a().to_vec(), kernel.b().to_vec(), inputs, outputs)
    }

    /// Denominator coefficients.
    pub fn a(&self) -> &[S] {
        &self.a
    }

    /// Numerator coefficients.
    pub fn b(&self) -> &[S] {
        &self.b
    }

    /// Input signal.
    pub fn inputs(&self) -> &[S] {
        &self.inputs
    }

    /// Output signal, oracle-computed or claimed by a candidate.
    pub fn outputs(&self) -> &[S] {
        &self.outputs
    }

    /// Number of coefficients in each of `a` and `b`.
    pub fn coefficient_count(&self) -> usize {
        self.a.len()
    }

    /// Number of input (and output) samples.
    pub fn sample_count(&self) -> usize {
        self.inputs.len()
    }

    /// Outputs recomputed by the oracle from this vector's coefficients and inputs.
    pub fn recompute(&self) -> Vec<S> {
        crate::oracle::apply(&self.a, &self.b, &self.inputs)
    }

    /// Same coefficients and inputs, new outputs.
    pub fn with_outputs<O>(&self, outputs: &O) -> Result<Self>
    where
        O: Read1D<S> + ?Sized,
    {
        let outputs = outputs.read_slice()?;
        Self::new(
            self.a.clone(),
            self.b.clone(),
            self.inputs.clone(),
            outputs.to_vec(),
        )
    }

    /// Both coefficient sets multiplied by `factor`, rounded to `S`.
    ///
    /// Outputs are carried over untouched: dividing by `a[0]` makes the
    /// scale irrelevant to a correct filter.
    pub fn scaled(&self, factor: S) -> Self {
        Self {
            a: self.a.iter().map(|&c| c * factor).collect(),
            b: self.b.iter().map(|&c| c * factor).collect(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

/// A conformance case tagged with its precision.
#[derive(Debug, Clone, PartialEq)]
pub enum TestVector {
    /// Single precision case, tag `'f'`.
    Float32(VectorData<f32>),
    /// Double precision case, tag `'d'`.
    Float64(VectorData<f64>),
}

impl TestVector {
    /// Precision of the case.
    pub fn sample_type(&self) -> SampleType {
        match self {
            TestVector::Float32(_) => SampleType::Float32,
            TestVector::Float64(_) => SampleType::Float64,
        }
    }

    /// Number of coefficients in each of `a` and `b`.
    pub fn coefficient_count(&self) -> usize {
        match self {
            TestVector::Float32(v) => v.coefficient_count(),
            TestVector::Float64(v) => v.coefficient_count(),
        }
    }

    /// Number of input (and output) samples.
    pub fn sample_count(&self) -> usize {
        match self {
            TestVector::Float32(v) => v.sample_count(),
            TestVector::Float64(v) => v.sample_count(),
        }
    }

    /// Same case with oracle-computed outputs.
    ///
    /// Fails with a validation error when `a[0] == 0`.
    pub fn refreshed(&self) -> Result<Self> {
        fn fresh<S: Sample>(v: &VectorData<S>) -> Result<VectorData<S>> {
            VectorData::with_oracle_outputs(v.a().to_vec(), v.b().to_vec(), v.inputs().to_vec())
        }
        Ok(match self {
            TestVector::Float32(v) => fresh(v)?.into(),
            TestVector::Float64(v) => fresh(v)?.into(),
        })
    }
}

impl From<VectorData<f32>> for TestVector {
    fn from(value: VectorData<f32>) -> Self {
        TestVector::Float32(value)
    }
}

impl From<VectorData<f64>> for TestVector {
    fn from(value: VectorData<f64>) -> Self {
        TestVector::Float64(value)
    }
}

/// File flavour, chosen from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    /// Packed little-endian layout.
    Binary,
    /// Five comma separated lines.
    Text,
}

impl FixtureFormat {
    /// `.txt` is text, everything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") => FixtureFormat::Text,
            _ => FixtureFormat::Binary,
        }
    }
}

/// Read a fixture of either format.
///
/// Text fixtures carry no precision tag, so `text_type` picks it.
pub fn read_auto(path: impl AsRef<Path>, text_type: SampleType) -> Result<TestVector> {
    let path = path.as_ref();
    match FixtureFormat::from_path(path) {
        FixtureFormat::Binary => read(path),
        FixtureFormat::Text => read_text(path, text_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inconsistent_lengths() {
        let err = VectorData::<f32>::new(vec![1.0, 0.0], vec![1.0], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "b_coefs", .. }));

        let err =
            VectorData::<f64>::new(vec![1.0], vec![1.0], vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "outputs", .. }));

        let err = VectorData::<f64>::new(vec![], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "n_coefs", .. }));
    }

    #[test]
    fn oracle_outputs_are_attached() {
        let v = VectorData::with_oracle_outputs(vec![1.0f32, 0.0], vec![1.0, 0.0], vec![1.0, 0.0, 0.0])
            .expect("identity filter");
        assert_eq!(v.outputs(), &[1.0, 0.0, 0.0]);
        assert_eq!(v.coefficient_count(), 2);
        assert_eq!(v.sample_count(), 3);
    }

    #[test]
    fn oracle_outputs_reject_zero_leading_coefficient() {
        let err = VectorData::with_oracle_outputs(vec![0.0f64, 1.0], vec![1.0, 0.0], vec![1.0])
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "a", .. }));
    }

    #[test]
    fn scaling_keeps_outputs() {
        let v = VectorData::new(vec![1.0f32, 0.5], vec![0.25, 0.25], vec![1.0], vec![0.25])
            .expect("valid");
        let s = v.scaled(1.45);
        assert_eq!(s.a(), &[1.45f32, 0.5 * 1.45]);
        assert_eq!(s.outputs(), v.outputs());
        assert_eq!(s.inputs(), v.inputs());
    }

    #[test]
    fn refreshed_replaces_outputs_only() {
        let v: TestVector =
            VectorData::new(vec![1.0f64, -0.5], vec![1.0, 0.0], vec![1.0, 0.0], vec![9.0, 9.0])
                .expect("valid")
                .into();
        let TestVector::Float64(fresh) = v.refreshed().expect("refresh") else {
            panic!("precision changed")
        };
        assert_eq!(fresh.outputs(), &[1.0, 0.5]);
        assert_eq!(fresh.a(), &[1.0, -0.5]);
        assert_eq!(v.sample_type(), SampleType::Float64);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            FixtureFormat::from_path(Path::new("t1_norm_coefs.txt")),
            FixtureFormat::Text
        );
        assert_eq!(
            FixtureFormat::from_path(Path::new("t1_float.bin")),
            FixtureFormat::Binary
        );
        assert_eq!(FixtureFormat::from_path(Path::new("noext")), FixtureFormat::Binary);
    }
}
