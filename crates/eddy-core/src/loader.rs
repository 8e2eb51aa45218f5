// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Parameter and Waveform Loaders
// ─────────────────────────────────────────────────────────────────────
//! Plain-text readers for the two inputs of a compensation run.
//!
//! - Parameter files: whitespace-separated `amplitude rate` pairs,
//!   conventionally one pair per line.
//! - Waveform files: whitespace-separated samples, conventionally one
//!   per line.
//!
//! Line breaks carry no meaning; any unparsable token is fatal.

use std::fs;
use std::path::Path;

use eddy_physics::EddyModel;
use eddy_types::{EddyError, EddyResult};

fn parse_values(text: &str, source_name: &str) -> EddyResult<Vec<f64>> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|e| EddyError::Parse {
                source_name: source_name.to_string(),
                token: token.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Parse `amplitude rate` pairs into a model.
pub fn parse_parameters(text: &str, source_name: &str) -> EddyResult<EddyModel> {
    let values = parse_values(text, source_name)?;
    if values.is_empty() {
        return Err(EddyError::InvalidModel(format!(
            "no valid parameters found in {source_name}"
        )));
    }
    if values.len() % 2 != 0 {
        return Err(EddyError::Parse {
            source_name: source_name.to_string(),
            token: values[values.len() - 1].to_string(),
            message: "amplitude without a matching rate constant".to_string(),
        });
    }
    let pairs: Vec<(f64, f64)> = values.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    EddyModel::from_pairs(&pairs)
}

/// Parse a waveform; at least one sample is required.
pub fn parse_waveform(text: &str, source_name: &str) -> EddyResult<Vec<f64>> {
    let samples = parse_values(text, source_name)?;
    if samples.is_empty() {
        return Err(EddyError::EmptyWaveform(format!(
            "no samples found in {source_name}"
        )));
    }
    Ok(samples)
}

fn read_source(path: &Path) -> EddyResult<String> {
    fs::read_to_string(path).map_err(|source| EddyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_parameters(path: impl AsRef<Path>) -> EddyResult<EddyModel> {
    let path = path.as_ref();
    let text = read_source(path)?;
    let model = parse_parameters(&text, &path.display().to_string())?;
    log::debug!("loaded {} eddy-current modes from {}", model.len(), path.display());
    Ok(model)
}

pub fn load_waveform(path: impl AsRef<Path>) -> EddyResult<Vec<f64>> {
    let path = path.as_ref();
    let text = read_source(path)?;
    let samples = parse_waveform(&text, &path.display().to_string())?;
    log::debug!("loaded {} waveform samples from {}", samples.len(), path.display());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use eddy_physics::Mode;

    #[test]
    fn test_parse_parameters_lines() {
        let model = parse_parameters("0.1 0.3\n-0.05   0.01\n\n", "params").unwrap();
        assert_eq!(model.modes(), &[Mode::new(0.1, 0.3), Mode::new(-0.05, 0.01)]);
    }

    #[test]
    fn test_parse_parameters_ignores_line_layout() {
        let model = parse_parameters("0.1\n0.3 0.2\t0.5", "params").unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.modes()[1], Mode::new(0.2, 0.5));
    }

    #[test]
    fn test_parse_parameters_empty() {
        let err = parse_parameters("  \n", "params.txt").unwrap_err();
        assert!(matches!(err, EddyError::InvalidModel(_)));
        assert!(err.to_string().contains("params.txt"));
    }

    #[test]
    fn test_parse_parameters_odd_count() {
        let err = parse_parameters("0.1 0.3\n0.2", "params").unwrap_err();
        assert!(matches!(err, EddyError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_parse_parameters_bad_token() {
        match parse_parameters("0.1 fast", "params").unwrap_err() {
            EddyError::Parse { token, .. } => assert_eq!(token, "fast"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_waveform() {
        let samples = parse_waveform("0\n1\n1.5e0\n-2.25\n", "gradient").unwrap();
        assert_eq!(samples, vec![0.0, 1.0, 1.5, -2.25]);
    }

    #[test]
    fn test_parse_waveform_empty() {
        assert!(matches!(
            parse_waveform("", "gradient"),
            Err(EddyError::EmptyWaveform(_))
        ));
    }

    #[test]
    fn test_load_from_files() {
        let mut params = tempfile::NamedTempFile::new().unwrap();
        writeln!(params, "0.2 0.5").unwrap();
        let mut gradient = tempfile::NamedTempFile::new().unwrap();
        writeln!(gradient, "0\n1\n1\n0").unwrap();

        let model = load_parameters(params.path()).unwrap();
        let samples = load_waveform(gradient.path()).unwrap();
        assert_eq!(model.modes(), &[Mode::new(0.2, 0.5)]);
        assert_eq!(samples, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        match load_waveform(&missing).unwrap_err() {
            EddyError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            load_parameters(&missing),
            Err(EddyError::Io { .. })
        ));
    }
}
