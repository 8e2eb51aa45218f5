// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Waveform Snapshot Sinks
// ─────────────────────────────────────────────────────────────────────
//! Persistence for the working input waveform after each round.
//!
//! Only the latest round is retained: every write replaces the previous
//! snapshot. Write failures are returned as plain `io::Error`s; the
//! iterator logs them and carries on.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use eddy_types::config::MIN_PRECISION;

/// Destination for per-round input waveform snapshots.
pub trait SnapshotSink {
    /// Replace the stored snapshot with `input` as of `round`.
    fn write_snapshot(&mut self, round: usize, input: &[f64]) -> io::Result<()>;
}

/// One value per line, fixed-point with `precision` decimals.
pub fn format_waveform(values: &[f64], precision: usize) -> String {
    let mut out = String::with_capacity(values.len() * (precision + 4));
    for v in values {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{v:.precision$}");
    }
    out
}

/// Text-file sink; the file is truncated and rewritten every round.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
    precision: usize,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_precision(path, MIN_PRECISION)
    }

    /// Precision below 7 decimals is raised to 7.
    pub fn with_precision(path: impl Into<PathBuf>, precision: usize) -> Self {
        Self {
            path: path.into(),
            precision: precision.max(MIN_PRECISION),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for FileSnapshot {
    fn write_snapshot(&mut self, _round: usize, input: &[f64]) -> io::Result<()> {
        fs::write(&self.path, format_waveform(input, self.precision))
    }
}

/// In-memory sink holding the most recent snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    latest: Option<(usize, Vec<f64>)>,
    writes: usize,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round index of the stored snapshot.
    pub fn round(&self) -> Option<usize> {
        self.latest.as_ref().map(|(round, _)| *round)
    }

    pub fn waveform(&self) -> Option<&[f64]> {
        self.latest.as_ref().map(|(_, w)| w.as_slice())
    }

    /// Total number of writes received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotSink for MemorySnapshot {
    fn write_snapshot(&mut self, round: usize, input: &[f64]) -> io::Result<()> {
        match &mut self.latest {
            Some((r, w)) => {
                *r = round;
                w.clear();
                w.extend_from_slice(input);
            }
            None => self.latest = Some((round, input.to_vec())),
        }
        self.writes += 1;
        Ok(())
    }
}
