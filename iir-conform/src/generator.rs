//! Synthesis of conformance vectors.
//!
//! The input signal is a sine burst, three uniform noise segments and a
//! second identical sine burst. Outputs are computed once by the oracle and
//! shared by a normalized fixture and one whose coefficients are scaled by
//! [`NOT_NORMALIZED_SCALE`], so a candidate that assumes `a[0] == 1` fails
//! the second.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use iir_conform_core::{Error, Result, Sample, SampleType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::fixture::{self, TestVector, VectorData};
use crate::kernel::{ConfigError, KernelLifecycle};
use crate::traits::FilterDesign;

/// Samples in each sine burst.
pub const SINE_LEN: usize = 400;
/// Phase increment between sine samples, radians.
pub const SINE_STEP: f64 = 0.075;
/// Sine burst amplitude.
pub const SINE_AMPLITUDE: f64 = 1500.0;
/// Samples in each noise segment.
pub const NOISE_LEN: usize = 200;
/// Total input length.
pub const SIGNAL_LEN: usize = 2 * SINE_LEN + 3 * NOISE_LEN;
/// Coefficient scale of the "not normalized" fixture.
pub const NOT_NORMALIZED_SCALE: f64 = 1.45;
/// Seed used unless randomization is requested.
pub const DEFAULT_SEED: u64 = 0x11f0_5eed;

/// File name suffix of the unscaled fixture.
pub const NORMALIZED_SUFFIX: &str = "_norm_coefs";
/// File name suffix of the scaled fixture.
pub const NOT_NORMALIZED_SUFFIX: &str = "_not_norm_coefs";

/// `(scale, offset)` of the three noise segments: `scale * (U + offset)`.
const NOISE_SEGMENTS: [(f64, f64); 3] = [(1000.0, 0.0), (500.0, -0.5), (1000.0, -1.0)];

/// Where the noise segments get their randomness from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Reproducible stream.
    Fixed(u64),
    /// Fresh entropy on every run.
    Random,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Fixed(DEFAULT_SEED)
    }
}

impl SeedPolicy {
    fn rng(self) -> StdRng {
        match self {
            SeedPolicy::Fixed(seed) => StdRng::seed_from_u64(seed),
            SeedPolicy::Random => StdRng::from_os_rng(),
        }
    }
}

/// Constructor config for [`VectorGenerator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Number of coefficients, one more than the filter order handed to the
    /// design collaborator.
    pub n_coefs: usize,
    /// Design parameter passed through to the collaborator untouched.
    pub filter_param: f64,
    /// Precision of the emitted fixtures.
    pub sample_type: SampleType,
    /// Noise seed.
    pub seed: SeedPolicy,
}

/// Validated generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorGenerator {
    config: GeneratorConfig,
}

/// The two fixtures produced from one design.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPair {
    /// Coefficients as designed.
    pub normalized: TestVector,
    /// Coefficients scaled by [`NOT_NORMALIZED_SCALE`], same outputs.
    ///
    /// Not a reference: the oracle on the scaled coefficients rounds
    /// differently.
    pub not_normalized: TestVector,
}

impl KernelLifecycle for VectorGenerator {
    type Config = GeneratorConfig;

    fn try_new(config: Self::Config) -> std::result::Result<Self, ConfigError> {
        if config.n_coefs == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "n_coefs",
                reason: "at least one coefficient is required",
            });
        }
        if i32::try_from(config.n_coefs).is_err() {
            return Err(ConfigError::InvalidArgument {
                arg: "n_coefs",
                reason: "does not fit the 32-bit fixture header",
            });
        }
        if !config.filter_param.is_finite() {
            return Err(ConfigError::InvalidArgument {
                arg: "filter_param",
                reason: "must be finite",
            });
        }
        Ok(Self { config })
    }
}

impl VectorGenerator {
    /// Filter order requested from the design collaborator.
    pub fn order(&self) -> usize {
        self.config.n_coefs - 1
    }

    /// Design, synthesize and filter, without touching the filesystem.
    pub fn build<D>(&self, design: &D) -> Result<GeneratedPair>
    where
        D: FilterDesign + ?Sized,
    {
        match self.config.sample_type {
            SampleType::Float32 => self.build_typed::<f32, D>(design),
            SampleType::Float64 => self.build_typed::<f64, D>(design),
        }
    }

    /// Build and write `<basename>_norm_coefs.txt` and
    /// `<basename>_not_norm_coefs.txt`, plus `.bin` twins when `binary` is set.
    ///
    /// Only the normalized fixture is a reference. The not-normalized one
    /// stores the normalized outputs beside the scaled coefficients; it is
    /// input for candidate implementations and generally fails [`compare`]
    /// until its outputs are replaced (by a candidate or by the transcoder).
    ///
    /// [`compare`]: crate::compare::compare
    pub fn write<D>(&self, design: &D, basename: &Path, binary: bool) -> Result<Vec<PathBuf>>
    where
        D: FilterDesign + ?Sized,
    {
        let pair = self.build(design)?;
        let mut written = Vec::new();
        for (suffix, vector) in [
            (NORMALIZED_SUFFIX, &pair.normalized),
            (NOT_NORMALIZED_SUFFIX, &pair.not_normalized),
        ] {
            let text_path = suffixed(basename, suffix, "txt");
            fixture::write_text(&text_path, vector)?;
            written.push(text_path);
            if binary {
                let bin_path = suffixed(basename, suffix, "bin");
                fixture::write(&bin_path, vector)?;
                written.push(bin_path);
            }
        }
        for path in &written {
            info!(path = %path.display(), "wrote fixture");
        }
        Ok(written)
    }

    fn build_typed<S, D>(&self, design: &D) -> Result<GeneratedPair>
    where
        S: Sample,
        D: FilterDesign + ?Sized,
        TestVector: From<VectorData<S>>,
    {
        let designed = design.design(self.order(), self.config.filter_param)?;
        for (field, coefs) in [("b_coefs", &designed.b), ("a_coefs", &designed.a)] {
            if coefs.len() != self.config.n_coefs {
                return Err(Error::validation(
                    field,
                    format!(
                        "design returned {} coefficients, expected {}",
                        coefs.len(),
                        self.config.n_coefs
                    ),
                ));
            }
        }
        let to_samples = |c: &[f64]| -> Vec<S> {
            c.iter().map(|&v| S::from_f64_rounded(v)).collect()
        };

        let mut rng = self.config.seed.rng();
        let inputs = synthesize_input::<S, _>(&mut rng);
        let normalized = VectorData::with_oracle_outputs(
            to_samples(&designed.a),
            to_samples(&designed.b),
            inputs,
        )?;
        let not_normalized = normalized.scaled(S::from_f64_rounded(NOT_NORMALIZED_SCALE));

        info!(
            n_coefs = self.config.n_coefs,
            n_inputs = normalized.sample_count(),
            sample_type = %S::TYPE,
            "generated vector pair"
        );
        Ok(GeneratedPair {
            normalized: normalized.into(),
            not_normalized: not_normalized.into(),
        })
    }
}

/// The fixed input signal, rounded to `S`.
///
/// Values are computed in double precision and rounded once.
pub fn synthesize_input<S, R>(rng: &mut R) -> Vec<S>
where
    S: Sample,
    R: Rng,
{
    let sine = (0..SINE_LEN).map(|k| SINE_AMPLITUDE * (k as f64 * SINE_STEP).sin());
    let mut signal: Vec<S> = Vec::with_capacity(SIGNAL_LEN);
    signal.extend(sine.clone().map(S::from_f64_rounded));
    for (scale, offset) in NOISE_SEGMENTS {
        signal.extend(
            (0..NOISE_LEN).map(|_| S::from_f64_rounded(scale * (rng.random::<f64>() + offset))),
        );
    }
    signal.extend(sine.map(S::from_f64_rounded));
    signal
}

fn suffixed(basename: &Path, suffix: &str, ext: &str) -> PathBuf {
    let mut name = OsString::from(basename.as_os_str());
    name.push(suffix);
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{Butterworth, DesignedFilter};
    use crate::kernel::ExecInvariantViolation;

    type DesignResult = std::result::Result<DesignedFilter, ExecInvariantViolation>;

    fn generator(n_coefs: usize, sample_type: SampleType) -> VectorGenerator {
        VectorGenerator::try_new(GeneratorConfig {
            n_coefs,
            filter_param: 0.3,
            sample_type,
            seed: SeedPolicy::default(),
        })
        .expect("valid config")
    }

    #[test]
    fn signal_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let x: Vec<f64> = synthesize_input(&mut rng);
        assert_eq!(x.len(), SIGNAL_LEN);
        assert_eq!(SIGNAL_LEN, 1400);
        // Both bursts are identical.
        assert_eq!(x[..SINE_LEN], x[SINE_LEN + 3 * NOISE_LEN..]);
        assert_eq!(x[1], SINE_AMPLITUDE * SINE_STEP.sin());

        let segment = |i: usize| &x[SINE_LEN + i * NOISE_LEN..SINE_LEN + (i + 1) * NOISE_LEN];
        assert!(segment(0).iter().all(|v| (0.0..1000.0).contains(v)));
        assert!(segment(1).iter().all(|v| (-250.0..250.0).contains(v)));
        assert!(segment(2).iter().all(|v| (-1000.0..=0.0).contains(v)));
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let g = generator(4, SampleType::Float32);
        assert_eq!(g.build(&Butterworth).unwrap(), g.build(&Butterworth).unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let xa: Vec<f32> = synthesize_input(&mut a);
        let xb: Vec<f32> = synthesize_input(&mut b);
        assert_ne!(xa, xb);
    }

    #[test]
    fn order_is_one_less_than_coefficient_count() {
        let g = generator(4, SampleType::Float64);
        assert_eq!(g.order(), 3);
        let seen = |order: usize, _: f64| -> DesignResult {
            assert_eq!(order, 3);
            Ok(DesignedFilter {
                b: vec![1.0, 0.0, 0.0, 0.0],
                a: vec![1.0, 0.0, 0.0, 0.0],
            })
        };
        let pair = g.build(&seen).expect("build");
        assert_eq!(pair.normalized.coefficient_count(), 4);
    }

    #[test]
    fn pair_shares_outputs_and_scales_coefficients() {
        let pair = generator(4, SampleType::Float32).build(&Butterworth).unwrap();
        let (TestVector::Float32(norm), TestVector::Float32(scaled)) =
            (&pair.normalized, &pair.not_normalized)
        else {
            panic!("expected single precision")
        };
        assert_eq!(norm.outputs(), scaled.outputs());
        assert_eq!(norm.inputs(), scaled.inputs());
        assert_eq!(scaled.a()[0], norm.a()[0] * 1.45f32);
        assert_eq!(norm.sample_count(), SIGNAL_LEN);
    }

    #[test]
    fn design_with_wrong_length_is_rejected() {
        let short = |_: usize, _: f64| -> DesignResult {
            Ok(DesignedFilter {
                b: vec![1.0],
                a: vec![1.0],
            })
        };
        let err = generator(3, SampleType::Float32).build(&short).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "b_coefs", .. }));
    }

    #[test]
    fn rejects_zero_coefficients() {
        let err = VectorGenerator::try_new(GeneratorConfig {
            n_coefs: 0,
            filter_param: 0.3,
            sample_type: SampleType::Float32,
            seed: SeedPolicy::Random,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument { arg: "n_coefs", .. }));
    }

    #[test]
    fn suffixed_names() {
        assert_eq!(
            suffixed(Path::new("out/t1"), NORMALIZED_SUFFIX, "txt"),
            PathBuf::from("out/t1_norm_coefs.txt")
        );
    }
}
