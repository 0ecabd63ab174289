//! The reference computation candidate implementations are checked against.
//!
//! For every output index `t`
//!
//! ```text
//! y[t] = ( sum_{k=0}^{n-1} b[k] x[t-k] - sum_{k=1}^{n-1} a[k] y[t-k] ) / a[0]
//! ```
//!
//! with `x` and `y` zero before the first sample. Both sums run in ascending
//! `k` and every operation is carried out in the sample precision; the
//! comparator has no tolerance, so neither may change.

mod difference;
mod kernels;

pub use difference::apply;
pub use kernels::{OracleConfig, OracleKernel};
