use anyhow::{bail, Context, Result};
use iir_conform::design::Butterworth;
use iir_conform::fixture::{self, TestVector, VectorData};
use iir_conform::generator::{GeneratorConfig, SeedPolicy, VectorGenerator};
use iir_conform::kernel::KernelLifecycle;
use iir_conform::oracle;
use iir_conform::{Sample, SampleType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";
const ITERS: usize = 20;
const COEFFICIENT_COUNTS: [usize; 5] = [2, 3, 5, 7, 9];
const CUTOFFS: [f64; 2] = [0.1, 0.3];

const PY_LFILTER_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np
import scipy
import scipy.signal

env = json.loads(sys.stdin.read())
iters = int(env["iters"])
with open(env["fixture"], "rb") as fh:
    raw = fh.read()

n_coefs, n_inputs = (int(v) for v in np.frombuffer(raw, dtype="<i4", count=2))
dtype = {"f": "<f4", "d": "<f8"}[chr(raw[8])]
body = np.frombuffer(raw, dtype=dtype, offset=9)
a = body[:n_coefs]
b = body[n_coefs:2 * n_coefs]
x = body[2 * n_coefs:2 * n_coefs + n_inputs]

t0 = time.perf_counter_ns()
for _ in range(iters):
    y = scipy.signal.lfilter(b, a, x)
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": np.asarray(y, dtype=float).tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__,
    "scipy_version": scipy.__version__
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
    scipy_version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    sample_type: String,
    n_coefs: usize,
    cutoff: f64,
    samples: usize,
    mismatched: usize,
    bit_exact: bool,
    mae: f64,
    max_abs: f64,
    oracle_ns: f64,
    python_ns: f64,
    speedup_vs_python: f64,
    fixture: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    scipy_version: String,
    bit_exact_cases: usize,
    rows: Vec<ContractRow>,
}

/// Per-case agreement between the oracle outputs stored in a fixture and scipy.
struct Agreement {
    mismatched: usize,
    mae: f64,
    max_abs: f64,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

/// Generate fixtures over a grid of designs and check the oracle outputs
/// against `scipy.signal.lfilter` run on the same bytes.
fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    let fixtures_dir = out_dir.join("fixtures");
    fs::create_dir_all(&fixtures_dir).context("creating contract output directories")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();
    let mut versions = None;

    for sample_type in [SampleType::Float32, SampleType::Float64] {
        for n_coefs in COEFFICIENT_COUNTS {
            for cutoff in CUTOFFS {
                let case_id = format!("butter_n{n_coefs}_wc{cutoff}_{sample_type}");
                let generator = VectorGenerator::validated(GeneratorConfig {
                    n_coefs,
                    filter_param: cutoff,
                    sample_type,
                    seed: SeedPolicy::default(),
                })?;
                let vector = generator
                    .build(&Butterworth)
                    .with_context(|| format!("building case {case_id}"))?
                    .normalized;
                let path = fixtures_dir.join(format!("{case_id}.bin"));
                fixture::write(&path, &vector)?;

                let py = python_lfilter_eval(&python_bin, &path, ITERS)?;
                let (agreement, oracle_ns) = match &vector {
                    TestVector::Float32(v) => evaluate(&case_id, v, &py)?,
                    TestVector::Float64(v) => evaluate(&case_id, v, &py)?,
                };
                rows.push(ContractRow {
                    case_id,
                    sample_type: sample_type.to_string(),
                    n_coefs,
                    cutoff,
                    samples: vector.sample_count(),
                    mismatched: agreement.mismatched,
                    bit_exact: agreement.mismatched == 0,
                    mae: agreement.mae,
                    max_abs: agreement.max_abs,
                    oracle_ns,
                    python_ns: py.avg_ns,
                    speedup_vs_python: py.avg_ns / oracle_ns,
                    fixture: path.to_string_lossy().into_owned(),
                });
                if versions.is_none() {
                    versions = Some(py);
                }
            }
        }
    }

    let Some(version_probe) = versions else {
        bail!("no contract cases were evaluated");
    };
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.to_string_lossy().into_owned(),
        python_version: version_probe.python_version,
        numpy_version: version_probe.numpy_version,
        scipy_version: version_probe
            .scipy_version
            .unwrap_or_else(|| "unknown".to_string()),
        bit_exact_cases: rows.iter().filter(|row| row.bit_exact).count(),
        rows,
    };

    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_vec_pretty(&bundle).context("serializing summary bundle")?,
    )
    .context("writing summary.json")?;

    println!("Contract artifacts generated in: {}", out_dir.display());
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", out_dir.join("summary.json").display());
    println!("  - {}", fixtures_dir.display());
    println!(
        "  - bit exact: {}/{}",
        bundle.bit_exact_cases,
        bundle.rows.len()
    );

    Ok(())
}

fn detect_python_bin() -> PathBuf {
    std::env::var_os("PYTHON")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON_BIN))
}

fn python_lfilter_eval(python_bin: &Path, fixture: &Path, iters: usize) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        PY_LFILTER_SCRIPT,
        json!({
            "fixture": fixture.to_string_lossy(),
            "iters": iters
        }),
    )
}

fn run_python_eval(
    python_bin: &Path,
    script: &str,
    payload: serde_json::Value,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&payload).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    let parsed: PythonEval = serde_json::from_str(stdout.trim()).context("parsing python json")?;
    Ok(parsed)
}

/// Compare scipy's outputs with the fixture's, rounded back to `S`.
fn evaluate<S: Sample>(
    case_id: &str,
    vector: &VectorData<S>,
    py: &PythonEval,
) -> Result<(Agreement, f64)> {
    let expected = vector.outputs();
    if expected.len() != py.output.len() {
        bail!(
            "case {case_id} has mismatched output lengths: oracle={}, python={}",
            expected.len(),
            py.output.len()
        );
    }
    let reference: Vec<S> = py.output.iter().map(|&v| S::from_f64_rounded(v)).collect();
    let mismatched = expected
        .iter()
        .zip(&reference)
        .filter(|(x, y)| x.to_bits_u64() != y.to_bits_u64())
        .count();
    let errors: Vec<f64> = expected
        .iter()
        .zip(&reference)
        .map(|(x, y)| (x.to_f64_exact() - y.to_f64_exact()).abs())
        .collect();
    let agreement = Agreement {
        mismatched,
        mae: errors.iter().sum::<f64>() / errors.len().max(1) as f64,
        max_abs: errors.iter().copied().fold(0.0, f64::max),
    };

    let oracle_ns = benchmark_avg_ns(ITERS, || {
        std::hint::black_box(oracle::apply(vector.a(), vector.b(), vector.inputs()));
    });
    Ok((agreement, oracle_ns))
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> f64
where
    F: FnMut(),
{
    let start = Instant::now();
    for _ in 0..iters {
        f();
    }
    start.elapsed().as_nanos() as f64 / iters as f64
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,sample_type,n_coefs,cutoff,samples,mismatched,bit_exact,mae,max_abs,oracle_ns,python_ns,speedup_vs_python,fixture\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{:.12e},{:.12e},{:.3},{:.3},{:.6},{}\n",
            row.case_id,
            row.sample_type,
            row.n_coefs,
            row.cutoff,
            row.samples,
            row.mismatched,
            row.bit_exact,
            row.mae,
            row.max_abs,
            row.oracle_ns,
            row.python_ns,
            row.speedup_vs_python,
            row.fixture
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
