//! Bit-exact comparison of candidate outputs against the oracle.

use core::fmt;
use std::path::Path;

use iir_conform_core::{Error, Result, Sample, SampleType};
use itertools::Itertools;
use tracing::{info, warn};

use crate::fixture::{self, TestVector, VectorData, FRACTION_DIGITS};

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every candidate sample equals the oracle sample.
    Pass,
    /// At least one sample differs.
    Fail(Report),
}

impl Verdict {
    /// `true` for [`Verdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Turn a failure into [`Error::Comparison`].
    pub fn into_result(self) -> Result<()> {
        match self {
            Verdict::Pass => Ok(()),
            Verdict::Fail(report) => Err(report.to_error()),
        }
    }
}

/// First sample at which candidate and oracle disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch<S> {
    /// Sample index.
    pub index: usize,
    /// Candidate value.
    pub candidate: S,
    /// Oracle value.
    pub oracle: S,
}

/// Candidate vector next to the oracle outputs for the same coefficients and inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<S> {
    candidate: VectorData<S>,
    oracle: Vec<S>,
    difference_sum: S,
    mismatched: usize,
    first_mismatch: Option<Mismatch<S>>,
}

impl<S: Sample> Comparison<S> {
    /// Recompute the oracle outputs for `candidate` and diff them.
    pub fn new(candidate: VectorData<S>) -> Self {
        let oracle = candidate.recompute();
        let mut difference_sum = S::zero();
        let mut mismatched = 0;
        let mut first_mismatch = None;
        for (index, (&c, &o)) in candidate.outputs().iter().zip(&oracle).enumerate() {
            // Equal values contribute an exact zero, also for infinities; NaN never does.
            let identical = c == o;
            let diff = if identical { S::zero() } else { c - o };
            difference_sum = difference_sum + diff;
            if !identical {
                mismatched += 1;
                if first_mismatch.is_none() {
                    first_mismatch = Some(Mismatch {
                        index,
                        candidate: c,
                        oracle: o,
                    });
                }
            }
        }
        Self {
            candidate,
            oracle,
            difference_sum,
            mismatched,
            first_mismatch,
        }
    }

    /// The vector under test.
    pub fn candidate(&self) -> &VectorData<S> {
        &self.candidate
    }

    /// Oracle outputs.
    pub fn oracle(&self) -> &[S] {
        &self.oracle
    }

    /// Sum of `candidate - oracle` in sample precision, ascending index.
    pub fn difference_sum(&self) -> S {
        self.difference_sum
    }

    /// Number of samples that differ.
    pub fn mismatched(&self) -> usize {
        self.mismatched
    }

    /// First differing sample, if any.
    pub fn first_mismatch(&self) -> Option<Mismatch<S>> {
        self.first_mismatch
    }

    /// Zero difference sum and no differing sample.
    pub fn passed(&self) -> bool {
        self.difference_sum.is_zero() && self.mismatched == 0
    }
}

/// Diagnostic report, pasteable into Octave or MATLAB.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Single precision comparison.
    Float32(Comparison<f32>),
    /// Double precision comparison.
    Float64(Comparison<f64>),
}

impl Report {
    /// Compare a loaded candidate vector.
    pub fn new(candidate: &TestVector) -> Self {
        match candidate {
            TestVector::Float32(v) => Report::Float32(Comparison::new(v.clone())),
            TestVector::Float64(v) => Report::Float64(Comparison::new(v.clone())),
        }
    }

    /// Precision of the compared vector.
    pub fn sample_type(&self) -> SampleType {
        match self {
            Report::Float32(_) => SampleType::Float32,
            Report::Float64(_) => SampleType::Float64,
        }
    }

    /// See [`Comparison::passed`].
    pub fn passed(&self) -> bool {
        match self {
            Report::Float32(c) => c.passed(),
            Report::Float64(c) => c.passed(),
        }
    }

    /// Number of differing samples.
    pub fn mismatched(&self) -> usize {
        match self {
            Report::Float32(c) => c.mismatched(),
            Report::Float64(c) => c.mismatched(),
        }
    }

    /// Number of compared samples.
    pub fn total(&self) -> usize {
        match self {
            Report::Float32(c) => c.oracle().len(),
            Report::Float64(c) => c.oracle().len(),
        }
    }

    /// Difference sum widened to `f64`.
    pub fn difference_sum(&self) -> f64 {
        match self {
            Report::Float32(c) => c.difference_sum().to_f64_exact(),
            Report::Float64(c) => c.difference_sum(),
        }
    }

    /// Fold into a verdict.
    pub fn verdict(self) -> Verdict {
        if self.passed() {
            Verdict::Pass
        } else {
            Verdict::Fail(self)
        }
    }

    fn to_error(&self) -> Error {
        Error::Comparison {
            mismatched: self.mismatched(),
            total: self.total(),
            difference_sum: self.difference_sum(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Float32(c) => write_octave(f, c),
            Report::Float64(c) => write_octave(f, c),
        }
    }
}

/// Compare an in-memory candidate.
pub fn compare_vector(candidate: &TestVector) -> Verdict {
    let report = Report::new(candidate);
    if report.passed() {
        info!(
            samples = report.total(),
            sample_type = %report.sample_type(),
            "candidate matches oracle bit for bit"
        );
    } else {
        warn!(
            mismatched = report.mismatched(),
            samples = report.total(),
            difference_sum = report.difference_sum(),
            "candidate diverges from oracle"
        );
    }
    report.verdict()
}

/// Read a binary candidate fixture and compare it.
pub fn compare(path: impl AsRef<Path>) -> Result<Verdict> {
    Ok(compare_vector(&fixture::read(path)?))
}

fn write_octave<S: Sample>(f: &mut fmt::Formatter<'_>, c: &Comparison<S>) -> fmt::Result {
    let single = S::TYPE == SampleType::Float32;
    let array = |values: &[S]| {
        let body = values
            .iter()
            .map(|v| format!("{v:.prec$}", prec = FRACTION_DIGITS))
            .join(",");
        if single {
            format!("single([{body}])")
        } else {
            format!("[{body}]")
        }
    };
    let v = c.candidate();
    writeln!(f, "a_coefs={}", array(v.a()))?;
    writeln!(f, "b_coefs={}", array(v.b()))?;
    writeln!(f, "inputs={}", array(v.inputs()))?;
    writeln!(f, "candidate_out={}", array(v.outputs()))?;
    writeln!(f, "oracle_out={}", array(c.oracle()))?;
    writeln!(
        f,
        "ml_out = filter(b_coefs,a_coefs,inputs);{} hold off; plot(inputs,'g'); hold on; plot(candidate_out,'r'); plot(ml_out,'b')",
        if single { " ml_out = single(ml_out);" } else { "" }
    )?;
    writeln!(f, "diff = candidate_out - ml_out")?;
    writeln!(
        f,
        "sprintf('Maximum difference between candidate and reference filtered signals: %e', max(abs(diff)))"
    )?;
    writeln!(f, "% tested type: {}", S::TYPE)?;
    writeln!(f, "% sum(candidate_out - oracle_out) = {:e}", c.difference_sum())?;
    writeln!(
        f,
        "% mismatched samples: {} of {}",
        c.mismatched(),
        c.oracle().len()
    )?;
    if let Some(m) = c.first_mismatch() {
        writeln!(
            f,
            "% first mismatch at {}: candidate {:e}, oracle {:e}",
            m.index, m.candidate, m.oracle
        )?;
    }
    Ok(())
}
