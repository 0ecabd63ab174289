use std::path::PathBuf;
use thiserror::Error;

/// Errors raised whilst reading, writing or checking fixtures.
#[derive(Error, Debug)]
pub enum Error {
    /// A tool was invoked with the wrong arguments; carries the usage text.
    #[error("{0}")]
    Usage(String),

    /// The byte or text stream does not follow the fixture layout.
    #[error("format error: {reason}")]
    Format {
        /// Explaining what could not be decoded.
        reason: String,
    },

    /// Declared and actual lengths disagree, or a value is out of range.
    #[error("validation error on `{field}`: {reason}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Explaining why the field is invalid.
        reason: String,
    },

    /// Candidate outputs differ from the oracle outputs.
    #[error(
        "comparison error: {mismatched} of {total} samples differ (sum of differences {difference_sum:e})"
    )]
    Comparison {
        /// Number of samples whose difference is not zero.
        mismatched: usize,
        /// Total number of compared samples.
        total: usize,
        /// Sum of `candidate - oracle`, widened to `f64` for display.
        difference_sum: f64,
    },

    /// Underlying filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// The source error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Error::Format {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Workspace result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_names_the_field() {
        let err = Error::validation("a_coefs", "expected 4 values, got 3");
        assert_eq!(
            err.to_string(),
            "validation error on `a_coefs`: expected 4 values, got 3"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::io(
            "missing.bin",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("missing.bin"));
        assert!(err.source().is_some());
    }
}
