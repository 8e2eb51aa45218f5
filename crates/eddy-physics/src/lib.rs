// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Response Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Multi-exponential eddy-current model and its discrete-time response
//! to a commanded gradient waveform.

pub mod modes;
pub mod response;

pub use modes::{EddyModel, Mode};
pub use response::{compute_predicted, max_abs_deviation, ResponseModel};
