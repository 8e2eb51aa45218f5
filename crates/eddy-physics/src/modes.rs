// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Exponential Mode Model
// ─────────────────────────────────────────────────────────────────────
//! Multi-exponential eddy-current model: an ordered, immutable sequence
//! of (amplitude, rate constant) modes.
//!
//! Each mode is a first-order decay driven by the per-sample change of
//! the applied gradient. A rate constant r in (0, 1] decays the mode's
//! current geometrically by (1 - r) every sample; values outside that
//! range are physically implausible but still accepted.

use serde::{Deserialize, Serialize};

use eddy_types::{EddyError, EddyResult};

/// One exponential eddy-current component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    /// Signed coupling strength.
    pub amplitude: f64,
    /// Per-sample decay factor.
    pub rate_constant: f64,
}

impl Mode {
    pub fn new(amplitude: f64, rate_constant: f64) -> Self {
        Self {
            amplitude,
            rate_constant,
        }
    }

    /// True when the discrete decay is stable and non-oscillating.
    #[inline]
    pub fn has_stable_rate(&self) -> bool {
        self.rate_constant > 0.0 && self.rate_constant <= 1.0
    }
}

/// Ordered mode sequence, fixed at construction.
///
/// Serialises as a plain list of modes; deserialising re-runs the
/// construction checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Mode>", into = "Vec<Mode>")]
pub struct EddyModel {
    modes: Vec<Mode>,
}

impl EddyModel {
    pub fn new(modes: Vec<Mode>) -> EddyResult<Self> {
        if modes.is_empty() {
            return Err(EddyError::InvalidModel(
                "model must contain at least one mode".to_string(),
            ));
        }
        for (i, mode) in modes.iter().enumerate() {
            if !mode.has_stable_rate() {
                log::warn!(
                    "mode {i}: rate constant {} outside (0, 1], response may diverge",
                    mode.rate_constant
                );
            }
        }
        let model = Self { modes };
        if model.amplitude_sum() >= 1.0 {
            log::warn!(
                "sum of |amplitude| = {:.4} >= 1, compensation may not converge",
                model.amplitude_sum()
            );
        }
        Ok(model)
    }

    /// Build from parallel amplitude and rate-constant sequences.
    pub fn from_parts(amplitudes: &[f64], rate_constants: &[f64]) -> EddyResult<Self> {
        if amplitudes.len() != rate_constants.len() {
            return Err(EddyError::InvalidModel(format!(
                "{} amplitudes but {} rate constants",
                amplitudes.len(),
                rate_constants.len()
            )));
        }
        Self::new(
            amplitudes
                .iter()
                .zip(rate_constants)
                .map(|(&a, &r)| Mode::new(a, r))
                .collect(),
        )
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> EddyResult<Self> {
        Self::new(pairs.iter().map(|&(a, r)| Mode::new(a, r)).collect())
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Always false for a constructed model; kept for slice-like parity.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.amplitude).collect()
    }

    pub fn rate_constants(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.rate_constant).collect()
    }

    /// Σ |amplitude_i|.
    pub fn amplitude_sum(&self) -> f64 {
        self.modes.iter().map(|m| m.amplitude.abs()).sum()
    }

    /// Every rate in (0, 1] and Σ |amplitude| < 1.
    ///
    /// Under these conditions the fixed-point correction typically
    /// converges; outside them it may diverge.
    pub fn is_well_conditioned(&self) -> bool {
        self.modes.iter().all(Mode::has_stable_rate) && self.amplitude_sum() < 1.0
    }
}

impl TryFrom<Vec<Mode>> for EddyModel {
    type Error = EddyError;

    fn try_from(modes: Vec<Mode>) -> EddyResult<Self> {
        Self::new(modes)
    }
}

impl From<EddyModel> for Vec<Mode> {
    fn from(model: EddyModel) -> Self {
        model.modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_ok() {
        let model = EddyModel::from_parts(&[0.1, -0.05], &[0.3, 0.01]).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.modes()[1], Mode::new(-0.05, 0.01));
        assert_eq!(model.amplitudes(), vec![0.1, -0.05]);
        assert_eq!(model.rate_constants(), vec![0.3, 0.01]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = EddyModel::from_parts(&[0.1, 0.2], &[0.3]).unwrap_err();
        assert!(matches!(err, EddyError::InvalidModel(_)), "{err}");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            EddyModel::from_parts(&[], &[]),
            Err(EddyError::InvalidModel(_))
        ));
        assert!(EddyModel::from_pairs(&[]).is_err());
        assert!(EddyModel::new(Vec::new()).is_err());
    }

    #[test]
    fn test_implausible_rate_accepted() {
        let model = EddyModel::from_pairs(&[(0.1, 1.5), (0.1, -0.2)]).unwrap();
        assert_eq!(model.len(), 2);
        assert!(!model.is_well_conditioned());
    }

    #[test]
    fn test_well_conditioned() {
        let model = EddyModel::from_pairs(&[(0.1, 0.3), (-0.2, 1.0)]).unwrap();
        assert!((model.amplitude_sum() - 0.3).abs() < 1e-15);
        assert!(model.is_well_conditioned());

        let heavy = EddyModel::from_pairs(&[(0.6, 0.3), (0.5, 0.2)]).unwrap();
        assert!(!heavy.is_well_conditioned());
    }
}
