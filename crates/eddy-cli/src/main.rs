// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Command-Line Front End
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! `eddy-comp [-v] [-n NUM] PARAMETERS GRADIENT [OUTPUT]`
//!
//! Reports go to stdout, diagnostics to stderr. Any fatal error prints
//! `ERROR: <message>` and exits non-zero.

mod app;
mod cli;
mod plot;

use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use eddy_types::EddyResult;

use crate::cli::Cli;

/// Route `log` records to stderr; `RUST_LOG` overrides the level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn try_main() -> EddyResult<()> {
    let cli = Cli::parse_args()?;
    init_logging(cli.verbose);
    let config = cli.resolve_config()?;
    log::debug!("configuration: {config:?}");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    app::run(&config, &cli.parameters, &cli.gradient, &mut out)
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
