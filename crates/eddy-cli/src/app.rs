// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — CLI Run Loop
// ─────────────────────────────────────────────────────────────────────
//! Load inputs, run the compensator and print reports and overlays.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use eddy_core::{load_parameters, load_waveform, Compensator, FileSnapshot, SnapshotSink};
use eddy_types::{CompensatorConfig, EddyError, EddyResult, RoundReport};

use crate::plot::render_overlay;

fn stdout_error(source: io::Error) -> EddyError {
    EddyError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

/// Run one compensation and write reports (and overlays) to `out`.
pub fn run(
    config: &CompensatorConfig,
    parameters: &Path,
    gradient: &Path,
    out: &mut dyn Write,
) -> EddyResult<()> {
    let model = load_parameters(parameters)?;
    let desired = load_waveform(gradient)?;
    let compensator = Compensator::new(desired, model, config.clone())?;

    let before = config.plot.then(|| {
        render_overlay(
            &[
                ("desired", compensator.desired()),
                ("predicted", compensator.initial_predicted()),
            ],
            config.plot_width,
            config.plot_height,
        )
    });

    let mut file_sink = config
        .snapshot_path
        .as_ref()
        .map(|path| FileSnapshot::with_precision(path, config.precision));
    let sink = file_sink.as_mut().map(|s| s as &mut dyn SnapshotSink);

    let mut write_error: Option<io::Error> = None;
    let mut on_report = |report: &RoundReport| {
        if write_error.is_some() {
            return;
        }
        let mut result = writeln!(out, "{}", report.format_line(config.precision));
        if report.round == 0 {
            if let Some(plot) = &before {
                result = result.and_then(|()| write!(out, "{plot}"));
            }
        }
        if let Err(e) = result {
            write_error = Some(e);
        }
    };
    let outcome = compensator.run(sink, &mut on_report)?;
    if let Some(e) = write_error {
        return Err(stdout_error(e));
    }

    if config.plot && outcome.rounds() > 0 {
        let after = render_overlay(
            &[
                ("input", outcome.input.as_slice()),
                ("predicted", outcome.predicted.as_slice()),
            ],
            config.plot_width,
            config.plot_height,
        );
        write!(out, "{after}").map_err(stdout_error)?;
    }
    out.flush().map_err(stdout_error)
}
