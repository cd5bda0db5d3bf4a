use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strum_macros::{Display, EnumString};

use crate::error::TableError;

pub const DEFAULT_DATASHEET: &str = "freq_resp_SPH0645LM4H-B-RevB.csv";

// Must match SLMSettings.h in the firmware.
const DEFAULT_BINS: usize = 1024;
const DEFAULT_SAMPLE_RATE: f64 = 48000.0;
const DEFAULT_FRACTIONAL_BITS: u32 = 8;

/// The fixed-point table is stored in a 64-bit word.
const MAX_FRACTIONAL_BITS: i64 = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NumberFormat {
    Hex,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    Table,
    Plot,
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bins: usize,
    pub sample_rate: f64,
    pub fractional_bits: u32,
    pub number_format: NumberFormat,
    pub output_mode: OutputMode,
    pub separator: char,
    pub skip_rows: usize,
    pub input: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bins: DEFAULT_BINS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            fractional_bits: DEFAULT_FRACTIONAL_BITS,
            number_format: NumberFormat::Hex,
            output_mode: OutputMode::Table,
            separator: ',',
            skip_rows: 0,
            input: PathBuf::from(DEFAULT_DATASHEET),
        }
    }
}

impl Settings {
    /// Later layers win.
    pub fn from_layers(layers: &[SettingsLayer]) -> Result<Self, TableError> {
        let mut merged = SettingsLayer::default();
        for layer in layers {
            merged.overlay(layer);
        }
        merged.resolve()
    }

    /// Table length for a real transform of `bins` points.
    pub fn bin_count(&self) -> usize {
        self.bins / 2
    }
}

/// Unvalidated settings as they come from a JSON file or the command line.
/// Numeric fields are signed so that negative input reaches validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsLayer {
    pub bins: Option<i64>,
    pub sample_rate: Option<f64>,
    pub fractional_bits: Option<i64>,
    pub number_format: Option<NumberFormat>,
    pub output_mode: Option<OutputMode>,
    pub separator: Option<char>,
    pub skip_rows: Option<usize>,
    pub input: Option<PathBuf>,
}

impl SettingsLayer {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| TableError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| TableError::Config(format!("{}: {}", path.display(), e)))
    }

    fn overlay(&mut self, other: &SettingsLayer) {
        if other.bins.is_some() {
            self.bins = other.bins;
        }
        if other.sample_rate.is_some() {
            self.sample_rate = other.sample_rate;
        }
        if other.fractional_bits.is_some() {
            self.fractional_bits = other.fractional_bits;
        }
        if other.number_format.is_some() {
            self.number_format = other.number_format;
        }
        if other.output_mode.is_some() {
            self.output_mode = other.output_mode;
        }
        if other.separator.is_some() {
            self.separator = other.separator;
        }
        if other.skip_rows.is_some() {
            self.skip_rows = other.skip_rows;
        }
        if other.input.is_some() {
            self.input = other.input.clone();
        }
    }

    fn resolve(self) -> Result<Settings, TableError> {
        let defaults = Settings::default();

        let bins = match self.bins {
            Some(bins) if bins <= 0 => {
                return Err(TableError::Config(format!(
                    "transform size must be positive, got {}",
                    bins
                )))
            }
            Some(bins) => usize::try_from(bins)
                .map_err(|_| TableError::Config(format!("transform size {} is too large", bins)))?,
            None => defaults.bins,
        };

        let sample_rate = self.sample_rate.unwrap_or(defaults.sample_rate);
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(TableError::Config(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }

        let fractional_bits = match self.fractional_bits {
            Some(bits) if bits < 0 => {
                return Err(TableError::Config(format!(
                    "fractional bits must not be negative, got {}",
                    bits
                )))
            }
            Some(bits) if bits > MAX_FRACTIONAL_BITS => {
                return Err(TableError::Config(format!(
                    "fractional bits must be at most {}, got {}",
                    MAX_FRACTIONAL_BITS, bits
                )))
            }
            Some(bits) => bits as u32,
            None => defaults.fractional_bits,
        };

        Ok(Settings {
            bins,
            sample_rate,
            fractional_bits,
            number_format: self.number_format.unwrap_or(defaults.number_format),
            output_mode: self.output_mode.unwrap_or(defaults.output_mode),
            separator: self.separator.unwrap_or(defaults.separator),
            skip_rows: self.skip_rows.unwrap_or(defaults.skip_rows),
            input: self.input.unwrap_or(defaults.input),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_firmware() {
        let settings = Settings::from_layers(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bin_count(), 512);
        assert_eq!(settings.fractional_bits, 8);
    }

    #[test]
    fn later_layer_overrides_earlier() {
        let file = SettingsLayer {
            bins: Some(256),
            sample_rate: Some(16000.0),
            ..Default::default()
        };
        let flags = SettingsLayer {
            bins: Some(64),
            output_mode: Some(OutputMode::Plot),
            ..Default::default()
        };
        let settings = Settings::from_layers(&[file, flags]).unwrap();
        assert_eq!(settings.bins, 64);
        assert_eq!(settings.sample_rate, 16000.0);
        assert_eq!(settings.output_mode, OutputMode::Plot);
        assert_eq!(settings.number_format, NumberFormat::Hex);
    }

    #[test]
    fn rejects_non_positive_transform_size() {
        for bins in [0, -4] {
            let layer = SettingsLayer {
                bins: Some(bins),
                ..Default::default()
            };
            assert!(matches!(
                Settings::from_layers(&[layer]),
                Err(TableError::Config(_))
            ));
        }
    }

    #[test]
    fn rejects_bad_sample_rate() {
        for rate in [0.0, -48000.0, f64::NAN] {
            let layer = SettingsLayer {
                sample_rate: Some(rate),
                ..Default::default()
            };
            assert!(matches!(
                Settings::from_layers(&[layer]),
                Err(TableError::Config(_))
            ));
        }
    }

    #[test]
    fn fractional_bits_bounds() {
        let negative = SettingsLayer {
            fractional_bits: Some(-1),
            ..Default::default()
        };
        assert!(Settings::from_layers(&[negative]).is_err());

        let wide = SettingsLayer {
            fractional_bits: Some(64),
            ..Default::default()
        };
        assert!(Settings::from_layers(&[wide]).is_err());

        let zero = SettingsLayer {
            fractional_bits: Some(0),
            ..Default::default()
        };
        assert_eq!(Settings::from_layers(&[zero]).unwrap().fractional_bits, 0);
    }

    #[test]
    fn odd_transform_size_rounds_bin_count_down() {
        let layer = SettingsLayer {
            bins: Some(9),
            ..Default::default()
        };
        assert_eq!(Settings::from_layers(&[layer]).unwrap().bin_count(), 4);
    }

    #[test]
    fn enums_parse_from_kebab_case() {
        assert_eq!(NumberFormat::from_str("decimal").unwrap(), NumberFormat::Decimal);
        assert_eq!(OutputMode::from_str("plot").unwrap(), OutputMode::Plot);
        assert!(OutputMode::from_str("graph").is_err());
        assert_eq!(NumberFormat::Hex.to_string(), "hex");
    }

    #[test]
    fn loads_json_layer() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"bins": 2048, "number_format": "decimal", "separator": ";", "skip_rows": 1}}"#
        )
        .unwrap();
        let layer = SettingsLayer::from_json_file(file.path()).unwrap();
        let settings = Settings::from_layers(&[layer]).unwrap();
        assert_eq!(settings.bin_count(), 1024);
        assert_eq!(settings.number_format, NumberFormat::Decimal);
        assert_eq!(settings.separator, ';');
        assert_eq!(settings.skip_rows, 1);
    }

    #[test]
    fn unknown_json_field_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"fft_size": 2048}}"#).unwrap();
        assert!(matches!(
            SettingsLayer::from_json_file(file.path()),
            Err(TableError::Config(_))
        ));
    }
}
