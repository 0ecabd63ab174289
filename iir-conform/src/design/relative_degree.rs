use nalgebra::Complex;

use crate::kernel::ConfigError;

/// Excess of poles over zeros; an improper transfer function is rejected.
pub(crate) fn relative_degree<F>(
    zeros: &[Complex<F>],
    poles: &[Complex<F>],
) -> Result<usize, ConfigError> {
    poles
        .len()
        .checked_sub(zeros.len())
        .ok_or(ConfigError::InvalidArgument {
            arg: "zpk",
            reason: "improper transfer function; poles must be >= zeros",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_excess_poles() {
        let z = [Complex::new(0.0, 0.0)];
        let p = [Complex::new(0.5, 0.0), Complex::new(-0.5, 0.0)];
        assert_eq!(relative_degree(&z, &p), Ok(1));
        assert!(relative_degree(&p, &z).is_err());
    }
}
