//! Construction and buffer plumbing shared by every kernel in the crate.
//!
//! Kernels (the oracle, the Butterworth design, the vector generator) are
//! built from a plain config through [`KernelLifecycle`] and read or write
//! samples through [`Read1D`] and [`Write1D`].

#![warn(missing_docs)]

mod errors;
mod io;
mod lifecycle;

pub use errors::{ConfigError, ExecInvariantViolation};
pub use io::{Read1D, Write1D};
pub use lifecycle::KernelLifecycle;
