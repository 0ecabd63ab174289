use iir_conform_core::Error;

/// Rejected kernel config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A coefficient set or signal that needs samples has none.
    #[error("`{arg}` must not be empty")]
    EmptyInput {
        /// Name of the empty argument.
        arg: &'static str,
    },

    /// A value is outside what the kernel accepts.
    #[error("`{arg}`: {reason}")]
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A strided buffer was handed to an adapter that needs one slice.
    #[error("`{arg}` is not a contiguous buffer")]
    NonContiguous {
        /// Name of the strided buffer.
        arg: &'static str,
    },

    /// Two arguments that must be the same length are not.
    #[error("`{arg}` has {got} elements, expected {expected}")]
    LengthMismatch {
        /// Name of the argument whose length is off.
        arg: &'static str,
        /// Length required by the other argument.
        expected: usize,
        /// Length supplied.
        got: usize,
    },
}

impl ConfigError {
    /// Name of the offending argument.
    pub fn arg(&self) -> &'static str {
        match self {
            ConfigError::EmptyInput { arg }
            | ConfigError::InvalidArgument { arg, .. }
            | ConfigError::NonContiguous { arg }
            | ConfigError::LengthMismatch { arg, .. } => *arg,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Error::validation(value.arg(), value.to_string())
    }
}

/// Failure while running an already validated kernel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecInvariantViolation {
    /// The computation left the representable range.
    #[error("kernel produced an unusable result: {reason}")]
    InvalidState {
        /// What went wrong.
        reason: &'static str,
    },

    /// Caller supplied an output buffer of the wrong size.
    #[error("output `{arg}` holds {got} samples, {expected} were produced")]
    LengthMismatch {
        /// Name of the output buffer.
        arg: &'static str,
        /// Samples produced by the kernel.
        expected: usize,
        /// Capacity of the supplied buffer.
        got: usize,
    },

    /// An adapter refused its buffer.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ExecInvariantViolation> for Error {
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::Config(err) => err.into(),
            ExecInvariantViolation::LengthMismatch { arg, .. } => {
                Error::validation(arg, value.to_string())
            }
            ExecInvariantViolation::InvalidState { .. } => {
                Error::validation("kernel", value.to_string())
            }
        }
    }
}
