//! Rewrite a fixture with freshly computed reference outputs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use iir_conform::cli;
use iir_conform::transcode::refresh_as;
use iir_conform::SampleType;

#[derive(Parser, Debug)]
#[command(
    name = "transcode",
    version,
    about = "Regenerate reference outputs for an IIR filter fixture",
    after_help = "Binary input FOO.bin is written to FOO_oracle.bin.\n\
                  Text input FOO.txt is written to FOO_float.bin or FOO_double.bin."
)]
struct Args {
    /// Fixture to refresh
    fixture: PathBuf,

    /// Precision used for text fixtures: f32 or f64
    #[arg(short, long, default_value = "f32")]
    precision: SampleType,

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
    let target = refresh_as(&args.fixture, args.precision)
        .with_context(|| format!("refreshing {}", args.fixture.display()))?;
    println!("{}", target.display());
    Ok(())
}
