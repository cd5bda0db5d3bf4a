use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use emitter::for_settings;
use frequency_weightings::generate_bin_vectors;
use settings::{NumberFormat, OutputMode, Settings, SettingsLayer};

mod emitter;
mod error;
mod fixed_point;
mod frequency_weightings;
mod logging;
mod mic_response;
mod settings;

mod domain {
    pub mod types;
}

#[derive(Debug, Parser)]
#[command(name = "bin-scale-table")]
#[command(
    about = "Precalculate the per-bin A-weighting and microphone correction table for the sound level meter firmware",
    long_about = None
)]
struct Args {
    /// Datasheet CSV: frequency (Hz), response (dB).
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON file with settings; flags given here override it.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Transform size; the table has bins/2 entries.
    #[arg(long, allow_hyphen_values = true)]
    bins: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    sample_rate: Option<f64>,

    /// Fractional bits of the fixed-point table entries.
    #[arg(long, allow_hyphen_values = true)]
    fractional_bits: Option<i64>,

    /// hex or decimal
    #[arg(long)]
    number_format: Option<NumberFormat>,

    /// table or plot
    #[arg(long)]
    output_mode: Option<OutputMode>,

    /// Column separator of the datasheet; a space splits on any whitespace.
    #[arg(long)]
    separator: Option<char>,

    /// Leading rows of the datasheet to ignore.
    #[arg(long)]
    skip_rows: Option<usize>,

    /// -v for info, -vv for debug.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// log4rs YAML file, replaces the default stderr logger.
    #[arg(long)]
    log_config: Option<PathBuf>,
}

impl Args {
    fn to_layer(&self) -> SettingsLayer {
        SettingsLayer {
            bins: self.bins,
            sample_rate: self.sample_rate,
            fractional_bits: self.fractional_bits,
            number_format: self.number_format,
            output_mode: self.output_mode,
            separator: self.separator,
            skip_rows: self.skip_rows,
            input: self.input.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = logging::init(args.verbose, args.log_config.as_deref()) {
        eprintln!("error: failed to set up logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("aborting: {:?}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut layers = Vec::new();
    if let Some(path) = &args.settings {
        layers.push(SettingsLayer::from_json_file(path)?);
    }
    layers.push(args.to_layer());
    let settings = Settings::from_layers(&layers)?;
    log::info!(
        "{} bins at {} Hz, Q{} {} {}",
        settings.bins,
        settings.sample_rate,
        settings.fractional_bits,
        settings.number_format,
        settings.output_mode
    );

    let mic_response = mic_response::load_datasheet(&settings.input, settings.separator, settings.skip_rows)
        .context("loading microphone datasheet")?;
    let vectors = generate_bin_vectors(&settings, &mic_response);

    // Render fully before writing so a failure leaves stdout empty.
    let emitter = for_settings(&settings, io::stdout().is_terminal());
    let mut out = Vec::new();
    let mut diag = Vec::new();
    emitter.emit(&vectors, &mut out, &mut diag)?;

    io::stdout().write_all(&out)?;
    io::stderr().write_all(&diag)?;
    log::info!("emitted {} bins", vectors.len());
    Ok(())
}
