// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, per-round reports and the error hierarchy shared by
//! the eddy-current response model and the compensation iterator.

pub mod config;
pub mod error;
pub mod report;

pub use config::CompensatorConfig;
pub use error::{EddyError, EddyResult};
pub use report::RoundReport;
