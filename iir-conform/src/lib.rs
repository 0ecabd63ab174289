//! Conformance harness for recursive (IIR) digital filters.
//!
//! A candidate filter implementation is checked against a reference
//! difference equation ([`oracle`]) using portable fixtures ([`fixture`]).
//! [`generator`] builds fixtures from a design collaborator, [`compare`]
//! decides bit-exact agreement, [`transcode`] regenerates references.
//!
//! ```
//! use iir_conform::compare::compare_vector;
//! use iir_conform::fixture::VectorData;
//!
//! let v = VectorData::with_oracle_outputs(vec![1.0f32, 0.0], vec![1.0, 0.0], vec![1.0, 0.0, 0.0])?;
//! assert_eq!(v.outputs(), &[1.0, 0.0, 0.0]);
//! assert!(compare_vector(&v.into()).is_pass());
//! # Ok::<(), iir_conform::Error>(())
//! ```

pub mod cli;
pub mod compare;
pub mod design;
pub mod fixture;
pub mod generator;
pub mod kernel;
pub mod oracle;
pub mod traits;
pub mod transcode;

pub use iir_conform_core::{Error, Result, Sample, SampleType};
