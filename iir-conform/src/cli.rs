//! Plumbing shared by the `generate`, `compare` and `transcode` binaries.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use iir_conform_core::Error;
use tracing_subscriber::EnvFilter;

/// Exit code for every failure, usage errors included.
pub const EXIT_FAILURE: u8 = 1;

/// Parse the process arguments.
///
/// Usage errors print the usage text to stdout and yield exit code 1;
/// `--help` and `--version` print and yield 0.
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
    parse_args_from::<P, _, _>(std::env::args_os())
}

/// [`parse_args`] over an explicit argument list.
pub fn parse_args_from<P, I, T>(args: I) -> Result<P, ExitCode>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    P::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{}", err.render());
            ExitCode::SUCCESS
        }
        _ => {
            println!("{}", Error::Usage(err.render().to_string()));
            ExitCode::from(EXIT_FAILURE)
        }
    })
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();
}

/// Map a tool outcome to its exit code, printing the error chain.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
