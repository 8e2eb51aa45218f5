// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Per-Round Report Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

/// Decimal digits used for round 0 and intermediate rounds.
pub const DEFAULT_REPORT_PRECISION: usize = 6;

/// Convergence report for one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Round index; 0 is the uncorrected baseline.
    pub round: usize,
    /// max_t |desired[t] - predicted[t]| after this round.
    pub max_abs_deviation: f64,
    /// True for the last configured round (never for round 0).
    pub is_final: bool,
}

impl RoundReport {
    pub fn new(round: usize, max_abs_deviation: f64, is_final: bool) -> Self {
        Self {
            round,
            max_abs_deviation,
            is_final,
        }
    }

    /// Human-readable report line. The final round uses `final_precision`.
    pub fn format_line(&self, final_precision: usize) -> String {
        let precision = if self.is_final {
            final_precision
        } else {
            DEFAULT_REPORT_PRECISION
        };
        format!(
            "iteration {}, maximum absolute deviation = {:.*}",
            self.round, precision, self.max_abs_deviation
        )
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_line(crate::config::MIN_PRECISION))
    }
}
