//! Human readable fixture layout.
//!
//! Five newline-terminated lines:
//!
//! ```text
//! <n_coefs>, <n_inputs>
//! a_0, ..., a_{n-1}
//! b_0, ..., b_{n-1}
//! x_0, ..., x_{m-1}
//! y_0, ..., y_{m-1}
//! ```
//!
//! Values are printed with ten fractional digits, so this form only round
//! trips to that precision. Use the binary form when exactness matters.

use std::path::Path;

use iir_conform_core::{Error, Result, Sample, SampleType};
use itertools::Itertools;
use tracing::debug;

use super::{TestVector, VectorData};

/// Digits after the decimal point in the text form.
pub const FRACTION_DIGITS: usize = 10;

/// Render a vector as fixture text.
pub fn render_text(vector: &TestVector) -> String {
    match vector {
        TestVector::Float32(v) => render_data(v),
        TestVector::Float64(v) => render_data(v),
    }
}

/// Parse fixture text into a vector of the given precision.
pub fn parse_text(text: &str, sample_type: SampleType) -> Result<TestVector> {
    Ok(match sample_type {
        SampleType::Float32 => parse_data::<f32>(text)?.into(),
        SampleType::Float64 => parse_data::<f64>(text)?.into(),
    })
}

/// Write a text fixture to `path`.
pub fn write_text(path: impl AsRef<Path>, vector: &TestVector) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_text(vector)).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "wrote text fixture");
    Ok(())
}

/// Read a text fixture from `path`.
pub fn read_text(path: impl AsRef<Path>, sample_type: SampleType) -> Result<TestVector> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_text(&text, sample_type)
}

fn render_data<S: Sample>(v: &VectorData<S>) -> String {
    let line = |values: &[S]| {
        values
            .iter()
            .map(|x| format!("{x:.prec$}", prec = FRACTION_DIGITS))
            .join(", ")
    };
    let mut out = format!("{}, {}\n", v.coefficient_count(), v.sample_count());
    for section in [v.a(), v.b(), v.inputs(), v.outputs()] {
        out.push_str(&line(section));
        out.push('\n');
    }
    out
}

fn parse_data<S: Sample>(text: &str) -> Result<VectorData<S>> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| Error::Format {
        reason: "empty text fixture".into(),
    })?;
    let (n_coefs, n_inputs) = parse_header(header)?;
    debug!(n_coefs, n_inputs, sample_type = %S::TYPE, "parsing text fixture");

    let mut section = |name: &'static str, expected: usize| -> Result<Vec<S>> {
        let line = lines.next().ok_or_else(|| Error::Format {
            reason: format!("missing {name} line"),
        })?;
        parse_values(line, name, expected)
    };
    let a = section("a_coefs", n_coefs)?;
    let b = section("b_coefs", n_coefs)?;
    let inputs = section("inputs", n_inputs)?;
    let outputs = section("outputs", n_inputs)?;

    if lines.any(|l| !l.trim().is_empty()) {
        return Err(Error::validation(
            "outputs",
            "unexpected content after the fifth line",
        ));
    }
    VectorData::new(a, b, inputs, outputs)
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [n_coefs, n_inputs] = fields.as_slice() else {
        return Err(Error::Format {
            reason: format!("header `{line}` must be `<n_coefs>, <n_inputs>`"),
        });
    };
    let parse = |field: &'static str, s: &str| -> Result<i64> {
        s.parse::<i64>().map_err(|_| Error::Format {
            reason: format!("{field} `{s}` is not an integer"),
        })
    };
    let n_coefs = parse("n_coefs", *n_coefs)?;
    let n_inputs = parse("n_inputs", *n_inputs)?;
    if n_coefs < 1 {
        return Err(Error::validation(
            "n_coefs",
            format!("declared {n_coefs}, at least 1 required"),
        ));
    }
    let n_inputs = usize::try_from(n_inputs).map_err(|_| {
        Error::validation(
            "n_inputs",
            format!("declared {n_inputs}, must not be negative"),
        )
    })?;
    let n_coefs = usize::try_from(n_coefs)
        .map_err(|_| Error::validation("n_coefs", format!("{n_coefs} is too large")))?;
    Ok((n_coefs, n_inputs))
}

fn parse_values<S: Sample>(line: &str, name: &'static str, expected: usize) -> Result<Vec<S>> {
    if line.trim().is_empty() {
        return if expected == 0 {
            Ok(Vec::new())
        } else {
            Err(Error::validation(
                name,
                format!("expected {expected} values, got 0"),
            ))
        };
    }
    let values = line
        .split(',')
        .map(str::trim)
        .map(|s| {
            s.parse::<S>().map_err(|_| Error::Format {
                reason: format!("{name}: `{s}` is not a number"),
            })
        })
        .collect::<Result<Vec<S>>>()?;
    if values.len() != expected {
        return Err(Error::validation(
            name,
            format!("expected {expected} values, got {}", values.len()),
        ));
    }
    Ok(values)
}
