// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Compensation Iterator
// ─────────────────────────────────────────────────────────────────────
//! Fixed-point pre-emphasis of a desired gradient waveform.
//!
//! Starting from `input = desired`, every round nudges each input sample
//! by the deviation observed at that sample in the previous prediction:
//!
//!   input[t] += desired[t] - predicted[t]
//!
//! then re-simulates the eddy-current response. The iteration runs for
//! exactly the configured number of rounds; there is no early exit.
//!
//! States: `Initialized` → `Iterating { round }` → `Done`. With zero
//! rounds the compensator is `Done` straight after construction.

use serde::{Deserialize, Serialize};

use eddy_physics::{max_abs_deviation, EddyModel, ResponseModel};
use eddy_types::{CompensatorConfig, EddyError, EddyResult, RoundReport};

use crate::snapshot::SnapshotSink;

const MAX_PREALLOCATED_ROUNDS: usize = 4096;

/// Report callback: receives every round report that should be shown.
pub type ReportCallback<'a> = &'a mut dyn FnMut(&RoundReport);

/// Lifecycle of a compensation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensatorState {
    /// Round 0 evaluated, no correction applied yet.
    Initialized,
    /// `round` corrections applied, more to go.
    Iterating { round: usize },
    /// All configured rounds applied.
    Done,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationOutcome {
    /// Compensated input waveform after the last round.
    pub input: Vec<f64>,
    /// Predicted response to `input`.
    pub predicted: Vec<f64>,
    /// Predicted response to the uncorrected desired waveform (round 0).
    pub initial_predicted: Vec<f64>,
    /// Convergence metric per round; index 0 is the baseline.
    pub deviations: Vec<f64>,
}

impl CompensationOutcome {
    /// Number of correction rounds applied.
    pub fn rounds(&self) -> usize {
        self.deviations.len().saturating_sub(1)
    }

    pub fn initial_deviation(&self) -> f64 {
        self.deviations.first().copied().unwrap_or(0.0)
    }

    pub fn final_deviation(&self) -> f64 {
        self.deviations.last().copied().unwrap_or(0.0)
    }
}

/// Iterative feed-forward compensator.
///
/// Owns the working input buffer; the response model and its scratch
/// currents are reused for every round.
#[derive(Debug)]
pub struct Compensator {
    config: CompensatorConfig,
    response: ResponseModel,
    desired: Vec<f64>,
    input: Vec<f64>,
    predicted: Vec<f64>,
    initial_predicted: Vec<f64>,
    deviations: Vec<f64>,
    state: CompensatorState,
    warned_non_finite: bool,
}

impl Compensator {
    /// Validate inputs and evaluate round 0.
    pub fn new(
        desired: Vec<f64>,
        model: EddyModel,
        config: CompensatorConfig,
    ) -> EddyResult<Self> {
        config.validate()?;
        if desired.is_empty() {
            return Err(EddyError::EmptyWaveform(
                "desired waveform has no samples".to_string(),
            ));
        }

        let mut response = ResponseModel::new(model);
        let input = desired.clone();
        let predicted = response.predict(&input)?;
        let deviation = max_abs_deviation(&desired, &predicted);
        let state = if config.iterations == 0 {
            CompensatorState::Done
        } else {
            CompensatorState::Initialized
        };

        let mut deviations =
            Vec::with_capacity(config.iterations.min(MAX_PREALLOCATED_ROUNDS) + 1);
        deviations.push(deviation);

        let mut compensator = Self {
            config,
            response,
            desired,
            initial_predicted: predicted.clone(),
            input,
            predicted,
            deviations,
            state,
            warned_non_finite: false,
        };
        compensator.check_finite(0);
        Ok(compensator)
    }

    pub fn config(&self) -> &CompensatorConfig {
        &self.config
    }

    pub fn state(&self) -> CompensatorState {
        self.state
    }

    /// Corrections applied so far.
    pub fn round(&self) -> usize {
        self.deviations.len() - 1
    }

    pub fn desired(&self) -> &[f64] {
        &self.desired
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    pub fn predicted(&self) -> &[f64] {
        &self.predicted
    }

    pub fn initial_predicted(&self) -> &[f64] {
        &self.initial_predicted
    }

    pub fn deviations(&self) -> &[f64] {
        &self.deviations
    }

    /// Convergence metric of the latest round.
    pub fn current_deviation(&self) -> f64 {
        self.deviations[self.deviations.len() - 1]
    }

    /// Report for the uncorrected baseline.
    pub fn baseline_report(&self) -> RoundReport {
        RoundReport::new(0, self.deviations[0], false)
    }

    /// Apply one correction round.
    ///
    /// Returns `Ok(None)` once all configured rounds have run.
    pub fn step(&mut self) -> EddyResult<Option<RoundReport>> {
        let round = match self.state {
            CompensatorState::Done => return Ok(None),
            CompensatorState::Initialized => 1,
            CompensatorState::Iterating { round } => round + 1,
        };

        for ((x, d), p) in self.input.iter_mut().zip(&self.desired).zip(&self.predicted) {
            *x += d - p;
        }
        self.response.predict_into(&self.input, &mut self.predicted)?;

        let deviation = max_abs_deviation(&self.desired, &self.predicted);
        self.deviations.push(deviation);
        self.check_finite(round);
        log::debug!("round {round}: max |desired - predicted| = {deviation:e}");

        let is_final = round == self.config.iterations;
        self.state = if is_final {
            CompensatorState::Done
        } else {
            CompensatorState::Iterating { round }
        };
        Ok(Some(RoundReport::new(round, deviation, is_final)))
    }

    /// Run all remaining rounds.
    ///
    /// Round 0 is always reported, the final round always, intermediate
    /// rounds only when `verbose` is set. When a sink is given the input
    /// waveform is written after round 0 and after every round; a failed
    /// write is logged and the run continues.
    pub fn run(
        mut self,
        mut sink: Option<&mut dyn SnapshotSink>,
        on_report: ReportCallback<'_>,
    ) -> EddyResult<CompensationOutcome> {
        if self.round() == 0 {
            on_report(&self.baseline_report());
            self.write_snapshot(&mut sink, 0);
        }

        while let Some(report) = self.step()? {
            self.write_snapshot(&mut sink, report.round);
            if report.is_final || self.config.verbose {
                on_report(&report);
            }
        }

        Ok(self.into_outcome())
    }

    pub fn into_outcome(self) -> CompensationOutcome {
        CompensationOutcome {
            input: self.input,
            predicted: self.predicted,
            initial_predicted: self.initial_predicted,
            deviations: self.deviations,
        }
    }

    fn write_snapshot(&self, sink: &mut Option<&mut dyn SnapshotSink>, round: usize) {
        if let Some(sink) = sink.as_mut() {
            if let Err(e) = sink.write_snapshot(round, &self.input) {
                log::error!("failed to write snapshot for round {round}: {e}");
            }
        }
    }

    fn check_finite(&mut self, round: usize) {
        if self.warned_non_finite {
            return;
        }
        if self.predicted.iter().any(|p| !p.is_finite()) {
            log::warn!(
                "round {round}: predicted waveform is no longer finite, compensation diverged"
            );
            self.warned_non_finite = true;
        }
    }
}
