// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use std::path::PathBuf;

use thiserror::Error;

/// Root error type for all compensator failures.
///
/// Every variant is fatal: it is surfaced before any round runs and no
/// partial result is produced. Snapshot write failures are deliberately
/// absent, the iterator logs those and keeps going.
#[derive(Error, Debug)]
pub enum EddyError {
    /// Malformed or missing option (iteration count, precision, arguments).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A waveform with no samples.
    #[error("empty waveform: {0}")]
    EmptyWaveform(String),

    /// Empty mode sequence, or amplitude/rate sequences of unequal length.
    #[error("invalid eddy-current model: {0}")]
    InvalidModel(String),

    /// Buffer shape mismatch between caller-provided slices.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A token in a parameter or waveform source is not a number.
    #[error("parse error in {source_name}: {message} (token {token:?})")]
    Parse {
        source_name: String,
        token: String,
        message: String,
    },

    /// Parameter or waveform source could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type EddyResult<T> = Result<T, EddyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = EddyError::Io {
            path: PathBuf::from("params.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("params.txt"), "{msg}");
        assert!(msg.contains("no such file"), "{msg}");
    }

    #[test]
    fn test_parse_error_quotes_token() {
        let err = EddyError::Parse {
            source_name: "gradient.txt".into(),
            token: "1.0x".into(),
            message: "not a number".into(),
        };
        assert_eq!(
            err.to_string(),
            "parse error in gradient.txt: not a number (token \"1.0x\")"
        );
    }
}
