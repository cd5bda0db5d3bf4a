use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::types::{MicResponse, SpectrumPoint};
use crate::error::TableError;

/// Reads a digitized datasheet curve: frequency (Hz) in the first column,
/// response (dB) in the second. A whitespace separator splits on any run of
/// whitespace, which also covers measurement-mic calibration files.
pub fn load_datasheet<P: AsRef<Path>>(
    path: P,
    separator: char,
    skip_rows: usize,
) -> Result<MicResponse, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TableError::input_parse(path, e.to_string()))?;
    let reader = BufReader::new(file);

    let mut points: Vec<SpectrumPoint> = Vec::new();
    for (index, line) in reader.lines().enumerate().skip(skip_rows) {
        let line_no = index + 1;
        let line = line.map_err(|e| TableError::input_parse(path, format!("line {}: {}", line_no, e)))?;
        if line.trim().is_empty() {
            continue;
        }

        let point = parse_row(&line, separator)
            .map_err(|reason| TableError::input_parse(path, format!("line {}: {}", line_no, reason)))?;

        if let Some(prev) = points.last() {
            if point.frequency <= prev.frequency {
                return Err(TableError::input_parse(
                    path,
                    format!(
                        "line {}: frequency {} does not ascend from {}",
                        line_no, point.frequency, prev.frequency
                    ),
                ));
            }
        }
        points.push(point);
    }

    let mic_response =
        MicResponse::new(points).ok_or_else(|| TableError::input_parse(path, "no spectrum points"))?;
    log::info!("{}: {} spectrum points", path.display(), mic_response.points().len());
    Ok(mic_response)
}

fn parse_row(line: &str, separator: char) -> Result<SpectrumPoint, String> {
    let mut fields: Box<dyn Iterator<Item = &str> + '_> = if separator.is_whitespace() {
        Box::new(line.split_whitespace())
    } else {
        Box::new(line.split(separator).map(|f| f.trim().trim_matches('"')))
    };

    let frequency = parse_field(fields.next(), "frequency")?;
    let response = parse_field(fields.next(), "response")?;
    Ok(SpectrumPoint { frequency, response })
}

fn parse_field(field: Option<&str>, name: &str) -> Result<f64, String> {
    let raw = field
        .filter(|f| !f.is_empty())
        .ok_or_else(|| format!("missing {} column", name))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("{} '{}' is not a number", name, raw))?;
    if !value.is_finite() {
        return Err(format!("{} '{}' is not finite", name, raw));
    }
    Ok(value)
}
