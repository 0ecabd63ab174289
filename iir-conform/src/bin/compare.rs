//! Check a candidate fixture against the reference difference equation.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use iir_conform::cli;
use iir_conform::compare::{compare_vector, Report, Verdict};
use iir_conform::fixture;
use iir_conform::SampleType;

#[derive(Parser, Debug)]
#[command(
    name = "compare",
    version,
    about = "Compare a candidate IIR filter output against the reference",
    after_help = "Binary fixture layout, little-endian:\n  \
                  i32 n_coefs, i32 n_inputs, u8 type ('f' = f32, 'd' = f64),\n  \
                  a[n_coefs], b[n_coefs], inputs[n_inputs], outputs[n_inputs]\n\
                  Files ending in .txt are read as five-line text fixtures."
)]
struct Args {
    /// Candidate fixture
    fixture: PathBuf,

    /// Precision used for text fixtures: f32 or f64
    #[arg(short, long, default_value = "f32")]
    precision: SampleType,

    /// Print the Octave report even when the candidate passes
    #[arg(short, long)]
    dump: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match cli::parse_args::<Args>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    cli::init_logging(args.verbose);
    cli::finish(run(args))
}

fn run(args: Args) -> anyhow::Result<()> {
    let candidate = fixture::read_auto(&args.fixture, args.precision)
        .with_context(|| format!("reading {}", args.fixture.display()))?;
    println!(
        "n_coefs: {}, n_inputs: {}, type: {}",
        candidate.coefficient_count(),
        candidate.sample_count(),
        candidate.sample_type()
    );
    if args.dump {
        print!("{}", Report::new(&candidate));
    }
    match compare_vector(&candidate) {
        Verdict::Pass => {
            println!("SUCCESS: candidate output matches the reference bit for bit");
            Ok(())
        }
        Verdict::Fail(report) => {
            if !args.dump {
                print!("{report}");
            }
            Ok(report.verdict().into_result()?)
        }
    }
}
