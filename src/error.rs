//! Error types for Ensayo operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;
use std::path::PathBuf;

/// Main error type for Ensayo operations.
///
/// Covers the fatal failures of the analysis pipeline (missing input files,
/// malformed rows, unknown day abbreviations) as well as the numeric
/// failures the estimators can hit (dimension mismatches, invalid
/// hyperparameters).
///
/// # Examples
///
/// ```
/// use ensayo::error::EnsayoError;
///
/// let err = EnsayoError::UnknownDayAbbreviation {
///     prefix: "Xyz".to_string(),
/// };
/// assert!(err.to_string().contains("Xyz"));
/// ```
#[derive(Debug)]
pub enum EnsayoError {
    /// Input file does not exist.
    MissingFile {
        /// Path that was requested
        path: PathBuf,
    },

    /// A delimited file could not be parsed.
    Parse {
        /// File the bad row came from
        path: String,
        /// 1-based line number of the offending row
        line: usize,
        /// Parser message
        message: String,
    },

    /// Date string does not start with one of the seven known
    /// day-of-week abbreviations.
    UnknownDayAbbreviation {
        /// The 3-character prefix that failed to match
        prefix: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Matrix is not positive definite; the normal equations cannot
    /// be solved by Cholesky decomposition.
    NotPositiveDefinite,

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (permission denied, etc.).
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for EnsayoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsayoError::MissingFile { path } => {
                write!(f, "Input file not found: {}", path.display())
            }
            EnsayoError::Parse {
                path,
                line,
                message,
            } => {
                write!(f, "Parse error in {path} at line {line}: {message}")
            }
            EnsayoError::UnknownDayAbbreviation { prefix } => {
                write!(
                    f,
                    "Unknown day-of-week abbreviation: {prefix:?}, expected one of \
                     Sun/Mon/Tue/Wed/Thu/Fri/Sat"
                )
            }
            EnsayoError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Dimension mismatch: expected {expected}, got {actual}"
                )
            }
            EnsayoError::NotPositiveDefinite => {
                write!(f, "Matrix is not positive definite, cannot solve")
            }
            EnsayoError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            EnsayoError::Io(e) => write!(f, "I/O error: {e}"),
            EnsayoError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EnsayoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnsayoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EnsayoError {
    fn from(err: std::io::Error) -> Self {
        EnsayoError::Io(err)
    }
}

impl From<&str> for EnsayoError {
    fn from(msg: &str) -> Self {
        EnsayoError::Other(msg.to_string())
    }
}

impl From<String> for EnsayoError {
    fn from(msg: String) -> Self {
        EnsayoError::Other(msg)
    }
}

impl EnsayoError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, EnsayoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_display() {
        let err = EnsayoError::MissingFile {
            path: PathBuf::from("data/control.csv"),
        };
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("control.csv"));
    }

    #[test]
    fn test_parse_display() {
        let err = EnsayoError::Parse {
            path: "experiment.csv".to_string(),
            line: 12,
            message: "expected a number".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("experiment.csv"));
        assert!(msg.contains("line 12"));
        assert!(msg.contains("expected a number"));
    }

    #[test]
    fn test_unknown_day_abbreviation_display() {
        let err = EnsayoError::UnknownDayAbbreviation {
            prefix: "Foo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Foo"));
        assert!(msg.contains("Sun"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = EnsayoError::dimension_mismatch("n_samples", 10, 7);
        let msg = err.to_string();
        assert!(msg.contains("n_samples=10"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_invalid_hyperparameter_display() {
        let err = EnsayoError::InvalidHyperparameter {
            param: "train_fraction".to_string(),
            value: "1.5".to_string(),
            constraint: "0 < train_fraction < 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("train_fraction"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_from_io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EnsayoError = io.into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_from_str_and_string() {
        let a: EnsayoError = "plain message".into();
        let b: EnsayoError = String::from("owned message").into();
        assert_eq!(a.to_string(), "plain message");
        assert_eq!(b.to_string(), "owned message");
    }

    #[test]
    fn test_empty_input_helper() {
        let err = EnsayoError::empty_input("no records after cleaning");
        assert!(err.to_string().contains("empty input"));
    }
}
