use std::io::{self, Write};

use crate::domain::types::BinVectors;
use crate::fixed_point::{db_to_fixed_point, db_to_power_scale};
use crate::settings::{NumberFormat, OutputMode, Settings};

const PLOT_DATA_FILE: &str = "out.csv";
const PLOT_LABELS: [&str; 3] = ["mic response", "a-weighting", "total correction"];

/// Renders computed bin vectors. `out` receives the artifact, `diag` anything
/// meant for the operator.
pub trait Emitter {
    fn emit(&self, vectors: &BinVectors, out: &mut dyn Write, diag: &mut dyn Write) -> io::Result<()>;
}

pub fn for_settings(settings: &Settings, output_is_terminal: bool) -> Box<dyn Emitter> {
    match settings.output_mode {
        OutputMode::Table => Box::new(ScaleTableEmitter {
            number_format: settings.number_format,
            fractional_bits: settings.fractional_bits,
        }),
        OutputMode::Plot => Box::new(PlotEmitter { output_is_terminal }),
    }
}

/// Brace-delimited initializer for the firmware's power scale table.
pub struct ScaleTableEmitter {
    pub number_format: NumberFormat,
    pub fractional_bits: u32,
}

impl ScaleTableEmitter {
    fn format_scale(&self, db: f64) -> String {
        match self.number_format {
            NumberFormat::Hex => format!("0x{:x}", db_to_fixed_point(db, self.fractional_bits)),
            NumberFormat::Decimal => format!("{:?}", db_to_power_scale(db)),
        }
    }
}

impl Emitter for ScaleTableEmitter {
    fn emit(&self, vectors: &BinVectors, out: &mut dyn Write, _diag: &mut dyn Write) -> io::Result<()> {
        let entries: Vec<String> = vectors
            .correction
            .iter()
            .map(|&db| self.format_scale(db))
            .collect();
        writeln!(out, "{{{}}}", entries.join(","))
    }
}

/// Decibel columns for inspecting the curves with gnuplot.
pub struct PlotEmitter {
    pub output_is_terminal: bool,
}

impl Emitter for PlotEmitter {
    fn emit(&self, vectors: &BinVectors, out: &mut dyn Write, diag: &mut dyn Write) -> io::Result<()> {
        for i in 0..vectors.len() {
            writeln!(
                out,
                "{} {} {} {}",
                vectors.frequencies[i],
                vectors.mic_response[i],
                vectors.a_weighting[i],
                vectors.correction[i]
            )?;
        }

        if self.output_is_terminal {
            writeln!(diag)?;
            writeln!(
                diag,
                "use like : bin-scale-table --output-mode plot > {}",
                PLOT_DATA_FILE
            )
        } else {
            writeln!(diag, "plot using:")?;
            writeln!(diag, "{}", plot_command(PLOT_DATA_FILE, &PLOT_LABELS, "w l"))
        }
    }
}

/// gnuplot invocation for the operator to run by hand; column 1 is the x axis.
pub fn plot_command(filename: &str, labels: &[&str], style: &str) -> String {
    let plots: Vec<String> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("'{}' using 1:{} title '{}' {}", filename, i + 2, label, style))
        .collect();
    format!(
        "gnuplot -e \"set terminal png size 1920,1080;set logscale x 10;set yrange [-100:20];set term png;set output 'tables.png'; plot {}\"",
        plots.join(",")
    )
}
