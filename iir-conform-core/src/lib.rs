//! Shared primitives for `iir-conform`.
//!
//! The two supported sample precisions, their on-disk element codec and the
//! workspace error type live here so that every tool agrees on them.

mod error;
mod sample;

pub use error::{Error, Result};
pub use sample::{Sample, SampleType};
