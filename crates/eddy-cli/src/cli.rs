// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Command-Line Arguments
// ─────────────────────────────────────────────────────────────────────

use std::fs;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use eddy_types::{CompensatorConfig, EddyError, EddyResult};

/// Pre-emphasise a gradient waveform against a multi-exponential
/// eddy-current model.
#[derive(Debug, Parser)]
#[command(name = "eddy-comp", version, about)]
pub struct Cli {
    /// Report every round, not just the first and last.
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of correction rounds [default: 10].
    #[arg(short = 'n', long = "iterations", value_name = "NUM")]
    pub iterations: Option<usize>,

    /// JSON configuration file; explicit flags take precedence.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip the terminal waveform overlays.
    #[arg(long)]
    pub no_plot: bool,

    /// Eddy-current parameters: one `amplitude rate` pair per line.
    #[arg(value_name = "PARAMETERS")]
    pub parameters: PathBuf,

    /// Desired gradient waveform: one sample per line.
    #[arg(value_name = "GRADIENT")]
    pub gradient: PathBuf,

    /// Write the compensated waveform here after every round.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Parse process arguments; usage errors become `Configuration`.
    ///
    /// `--help` and `--version` print and exit directly.
    pub fn parse_args() -> EddyResult<Self> {
        Self::try_parse().map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => EddyError::Configuration(clap_message(&e)),
        })
    }

    /// Merge the optional config file with explicit flags and validate.
    pub fn resolve_config(&self) -> EddyResult<CompensatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|source| EddyError::Io {
                    path: path.clone(),
                    source,
                })?;
                CompensatorConfig::from_json(&json)?
            }
            None => CompensatorConfig::default(),
        };

        if self.verbose {
            config.verbose = true;
        }
        if let Some(n) = self.iterations {
            config.iterations = n;
        }
        if self.no_plot {
            config.plot = false;
        }
        if let Some(output) = &self.output {
            config.snapshot_path = Some(output.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Leading paragraph of a clap error, on one line, without `error: `.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let paragraph: Vec<&str> = rendered
        .lines()
        .take_while(|l| !l.trim().is_empty())
        .map(str::trim)
        .collect();
    let joined = paragraph.join(" ");
    joined.strip_prefix("error: ").unwrap_or(joined.as_str()).to_string()
}
