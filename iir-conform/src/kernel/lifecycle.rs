use iir_conform_core::Error;

use super::ConfigError;

/// Two-phase construction: a plain config struct is checked once by
/// [`try_new`](Self::try_new), after which the kernel runs without
/// re-validating.
pub trait KernelLifecycle: Sized {
    /// Plain data the kernel is built from.
    type Config;

    /// Validate `config` and build the kernel.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;

    /// [`try_new`](Self::try_new), reporting failures as
    /// [`Error::Validation`].
    fn validated(config: Self::Config) -> Result<Self, Error> {
        Self::try_new(config).map_err(Error::from)
    }
}
