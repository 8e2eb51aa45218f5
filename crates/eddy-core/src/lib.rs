// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Iterative feed-forward compensation of eddy-current distortion in
//! gradient waveforms.
//!
//! # Invariants
//!
//! 1. **Fixed round count**: a run applies exactly `iterations`
//!    corrections. Convergence is reported, never used to stop early.
//!
//! 2. **Cold response model**: every prediction starts from zero mode
//!    currents; nothing carries over between rounds except the input
//!    waveform itself.
//!
//! 3. **Load failures are fatal, snapshot failures are not**: unreadable
//!    or malformed parameter/waveform sources abort before round 0, a
//!    failed snapshot write is logged and the run continues.

pub mod compensator;
pub mod loader;
pub mod snapshot;

pub use compensator::{CompensationOutcome, Compensator, CompensatorState, ReportCallback};
pub use loader::{load_parameters, load_waveform, parse_parameters, parse_waveform};
pub use snapshot::{format_waveform, FileSnapshot, MemorySnapshot, SnapshotSink};
