// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Eddy-Current Response Model
// ─────────────────────────────────────────────────────────────────────
//! Discrete-time simulation of the multi-exponential eddy-current
//! response to a commanded gradient waveform:
//!
//!   dG[t]  = G[t] - G[t-1]                     (G[-1] = 0)
//!   c_i[t] = c_i[t-1] + dG[t] - c_i[t-1] r_i    (c_i[-1] = 0)
//!   P[t]   = G[t] - Σ_i A_i c_i[t]
//!
//! The per-mode currents live in a pre-allocated scratch buffer that is
//! zeroed at the start of every pass, so no state survives between calls.

use eddy_types::{EddyError, EddyResult};

use crate::modes::EddyModel;

/// Reusable evaluator for one eddy-current model.
#[derive(Debug, Clone)]
pub struct ResponseModel {
    model: EddyModel,
    // Pre-allocated scratch: one running current per mode
    currents: Vec<f64>,
}

impl ResponseModel {
    pub fn new(model: EddyModel) -> Self {
        let currents = vec![0.0; model.len()];
        Self { model, currents }
    }

    pub fn model(&self) -> &EddyModel {
        &self.model
    }

    /// Predict the observed waveform for `input`.
    pub fn predict(&mut self, input: &[f64]) -> EddyResult<Vec<f64>> {
        let mut predicted = vec![0.0; input.len()];
        self.predict_into(input, &mut predicted)?;
        Ok(predicted)
    }

    /// Predict into a caller-owned buffer of the same length as `input`.
    pub fn predict_into(&mut self, input: &[f64], predicted: &mut [f64]) -> EddyResult<()> {
        if input.is_empty() {
            return Err(EddyError::EmptyWaveform(
                "input waveform has no samples".to_string(),
            ));
        }
        if predicted.len() != input.len() {
            return Err(EddyError::InvalidInput(format!(
                "output buffer has {} samples, input has {}",
                predicted.len(),
                input.len()
            )));
        }

        self.currents.fill(0.0);
        let modes = self.model.modes();
        let mut prev_g = 0.0;

        for (out, &g) in predicted.iter_mut().zip(input) {
            let dg = g - prev_g;
            prev_g = g;

            for (current, mode) in self.currents.iter_mut().zip(modes) {
                *current = *current + dg - *current * mode.rate_constant;
            }

            let mut eddy_effect = 0.0;
            for (current, mode) in self.currents.iter().zip(modes) {
                eddy_effect += current * mode.amplitude;
            }

            *out = g - eddy_effect;
        }
        Ok(())
    }
}

/// One-shot prediction from parallel amplitude and rate sequences.
pub fn compute_predicted(
    input: &[f64],
    amplitudes: &[f64],
    rate_constants: &[f64],
) -> EddyResult<Vec<f64>> {
    let model = EddyModel::from_parts(amplitudes, rate_constants)?;
    ResponseModel::new(model).predict(input)
}

/// max_t |a[t] - b[t]| over the common length.
///
/// NaN samples are skipped (`f64::max` ignores a NaN operand); an
/// infinite deviation is returned as-is.
pub fn max_abs_deviation(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0_f64, |acc, (x, y)| acc.max((x - y).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::Mode;

    fn single_mode(amplitude: f64, rate: f64) -> ResponseModel {
        ResponseModel::new(EddyModel::from_pairs(&[(amplitude, rate)]).unwrap())
    }

    #[test]
    fn test_hand_computed_pulse() {
        let mut response = single_mode(0.2, 0.5);
        let predicted = response.predict(&[0.0, 1.0, 1.0, 1.0, 0.0, 0.0]).unwrap();
        let expected = [0.0, 0.8, 0.9, 0.95, 0.175, 0.0875];
        for (t, (p, e)) in predicted.iter().zip(expected).enumerate() {
            assert!((p - e).abs() < 1e-12, "t={t}: {p} vs {e}");
        }
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let model = EddyModel::from_pairs(&[(0.0, 0.3), (0.0, 0.9)]).unwrap();
        let mut response = ResponseModel::new(model);
        let input = [0.5, -1.25, 3.0, 3.0, 0.0, 7.5];
        assert_eq!(response.predict(&input).unwrap(), input.to_vec());
    }

    #[test]
    fn test_repeat_calls_identical() {
        let mut response = single_mode(0.15, 0.05);
        let input: Vec<f64> = (0..64).map(|t| ((t as f64) * 0.3).sin()).collect();
        let first = response.predict(&input).unwrap();
        let second = response.predict(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_length_preserved() {
        let mut response = single_mode(0.1, 0.3);
        for n in [1, 2, 17, 300] {
            let input = vec![1.0; n];
            assert_eq!(response.predict(&input).unwrap().len(), n);
        }
    }

    #[test]
    fn test_single_sample() {
        // First sample: dG = g, current = g, eddy = A g
        let mut response = single_mode(0.25, 0.5);
        let predicted = response.predict(&[2.0]).unwrap();
        assert!((predicted[0] - 1.5).abs() < 1e-15);
    }

    #[test]
    fn test_modes_superpose() {
        let input = [0.0, 1.0, 1.0, 0.5, 0.5, -1.0, 0.0];
        let both = compute_predicted(&input, &[0.1, -0.07], &[0.3, 0.8]).unwrap();
        let first = compute_predicted(&input, &[0.1], &[0.3]).unwrap();
        let second = compute_predicted(&input, &[-0.07], &[0.8]).unwrap();
        for t in 0..input.len() {
            let eddy_both = input[t] - both[t];
            let eddy_sum = (input[t] - first[t]) + (input[t] - second[t]);
            assert!((eddy_both - eddy_sum).abs() < 1e-12, "t={t}");
        }
    }

    #[test]
    fn test_constant_input_decays_to_input() {
        // Step response: current decays by (1 - r) per sample after the edge
        let mut response = single_mode(0.3, 0.4);
        let predicted = response.predict(&vec![1.0; 200]).unwrap();
        assert!((predicted[0] - 0.7).abs() < 1e-12);
        assert!((predicted[199] - 1.0).abs() < 1e-12);
        assert!(predicted.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut response = single_mode(0.1, 0.3);
        assert!(matches!(
            response.predict(&[]),
            Err(EddyError::EmptyWaveform(_))
        ));
    }

    #[test]
    fn test_output_buffer_mismatch_rejected() {
        let mut response = single_mode(0.1, 0.3);
        let mut out = vec![0.0; 3];
        assert!(matches!(
            response.predict_into(&[1.0, 2.0], &mut out),
            Err(EddyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_free_function_rejects_bad_model() {
        assert!(matches!(
            compute_predicted(&[1.0], &[0.1, 0.2], &[0.3]),
            Err(EddyError::InvalidModel(_))
        ));
        assert!(matches!(
            compute_predicted(&[1.0], &[], &[]),
            Err(EddyError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_unstable_rate_propagates_non_finite() {
        // |1 - r| > 1 grows the current geometrically until it overflows
        let model = EddyModel::new(vec![Mode::new(1.0, 3.0)]).unwrap();
        let mut response = ResponseModel::new(model);
        let predicted = response.predict(&vec![1.0; 2000]).unwrap();
        assert!(predicted.iter().any(|p| !p.is_finite()));
    }

    #[test]
    fn test_max_abs_deviation() {
        let dev = max_abs_deviation(&[0.0, 1.0, 1.0], &[0.0, 0.8, 1.3]);
        assert!((dev - 0.3).abs() < 1e-12, "{dev}");
        assert_eq!(max_abs_deviation(&[1.0, f64::NAN], &[0.5, 0.0]), 0.5);
        assert_eq!(max_abs_deviation(&[], &[]), 0.0);
    }
}
