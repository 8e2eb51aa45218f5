// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Runtime Configuration
// ─────────────────────────────────────────────────────────────────────

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EddyError, EddyResult};

/// Smallest decimal precision accepted for reports and snapshots.
pub const MIN_PRECISION: usize = 7;

/// f64 carries at most 17 significant decimal digits.
pub const MAX_PRECISION: usize = 17;

/// Runtime configuration for a compensation run.
///
/// Missing JSON fields fall back to [`CompensatorConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensatorConfig {
    /// Number of correction rounds R. Zero is legal.
    /// Default: 10.
    pub iterations: usize,

    /// Report intermediate rounds, not just round 0 and the last one.
    /// Default: false.
    pub verbose: bool,

    /// Where to write the working input waveform after every round.
    /// Default: none (no snapshotting).
    pub snapshot_path: Option<PathBuf>,

    /// Decimal digits for snapshot values and the final-round report.
    /// Default: 7.
    pub precision: usize,

    /// Render terminal overlays before and after correction.
    /// Default: true.
    pub plot: bool,

    /// Overlay width in character columns.
    /// Default: 72.
    pub plot_width: usize,

    /// Overlay height in character rows.
    /// Default: 16.
    pub plot_height: usize,
}

impl Default for CompensatorConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            verbose: false,
            snapshot_path: None,
            precision: MIN_PRECISION,
            plot: true,
            plot_width: 72,
            plot_height: 16,
        }
    }
}

impl CompensatorConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> EddyResult<()> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&self.precision) {
            return Err(EddyError::Configuration(format!(
                "precision must be in [{MIN_PRECISION}, {MAX_PRECISION}], got {}",
                self.precision
            )));
        }
        if let Some(path) = &self.snapshot_path {
            if path.as_os_str().is_empty() {
                return Err(EddyError::Configuration(
                    "snapshot_path must not be empty".to_string(),
                ));
            }
        }
        if self.plot && self.plot_width < 8 {
            return Err(EddyError::Configuration(format!(
                "plot_width must be >= 8, got {}",
                self.plot_width
            )));
        }
        if self.plot && self.plot_height < 3 {
            return Err(EddyError::Configuration(format!(
                "plot_height must be >= 3, got {}",
                self.plot_height
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> EddyResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| EddyError::Configuration(format!("JSON parse error: {e}")))
    }
}
