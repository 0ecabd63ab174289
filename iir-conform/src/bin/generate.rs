//! Generate a normalized and a not-normalized fixture from a Butterworth design.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use iir_conform::cli;
use iir_conform::design::Butterworth;
use iir_conform::generator::{GeneratorConfig, SeedPolicy, VectorGenerator, DEFAULT_SEED};
use iir_conform::kernel::KernelLifecycle;
use iir_conform::SampleType;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "generate",
    version,
    about = "Generate IIR filter conformance fixtures",
    after_help = "Writes <BASENAME>_norm_coefs.txt and <BASENAME>_not_norm_coefs.txt.\n\
                  Each holds a low-pass design of order N_COEFS-1 applied to a\n\
                  1400 sample signal (two sine bursts and three noise segments).\n\n\
                  Only the _norm_coefs fixture is a reference. The _not_norm_coefs\n\
                  fixture pairs coefficients scaled by 1.45 with the same outputs;\n\
                  it is input for a candidate implementation, and `compare` on it\n\
                  fails until the candidate (or `transcode`) rewrites the outputs."
)]
struct Args {
    /// Number of filter coefficients (filter order + 1)
    n_coefs: usize,

    /// Design parameter, the normalized cutoff for the bundled Butterworth design
    filter_param: f64,

    /// Output path prefix
    output_basename: PathBuf,

    /// Fixture precision: f32 or f64
    #[arg(short, long, default_value = "f32")]
    precision: SampleType,

    /// Noise seed
    #[arg(short, long, default_value_t = DEFAULT_SEED, conflicts_with = "random")]
    seed: u64,

    /// Seed the noise from OS entropy instead
    #[arg(long)]
    random: bool,

    /// Also write binary fixtures next to the text ones
    #[arg(short, long)]
    binary: bool,

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
    let seed = if args.random {
        SeedPolicy::Random
    } else {
        SeedPolicy::Fixed(args.seed)
    };
    let generator = VectorGenerator::validated(GeneratorConfig {
        n_coefs: args.n_coefs,
        filter_param: args.filter_param,
        sample_type: args.precision,
        seed,
    })?;
    info!(
        order = generator.order(),
        filter_param = args.filter_param,
        precision = %args.precision,
        "generating fixtures"
    );
    let written = generator
        .write(&Butterworth, &args.output_basename, args.binary)
        .with_context(|| format!("generating {}", args.output_basename.display()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
