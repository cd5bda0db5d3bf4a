use crate::domain::types::{BinVectors, MicResponse};
use crate::settings::Settings;

/// Center frequency of `bin` for a real transform of `settings.bins` points.
pub fn bin_frequency(bin: usize, settings: &Settings) -> f64 {
    bin as f64 * settings.sample_rate / settings.bins as f64
}

pub fn bin_frequencies(settings: &Settings) -> Vec<f64> {
    (0..settings.bin_count())
        .map(|i| bin_frequency(i, settings))
        .collect()
}

/// A-weighting in dB, offset so that 1 kHz reads 0 dB.
/// At 0 Hz this is negative infinity.
pub fn a_weighting_db(f: f64) -> f64 {
    let f2 = f * f;
    let ra_num = 12200.0 * 12200.0 * f2 * f2;
    let ra_den = (f2 + 20.6 * 20.6)
        * (f2 + 12200.0 * 12200.0)
        * ((f2 + 107.7 * 107.7) * (f2 + 737.9 * 737.9)).sqrt();

    let ra = ra_num / ra_den;
    20.0 * ra.log10() + 2.0
}

pub fn generate_bin_vectors(settings: &Settings, mic_response: &MicResponse) -> BinVectors {
    let frequencies = bin_frequencies(settings);
    let mic = mic_response.interpolate(&frequencies);
    let a_weighting = frequencies.iter().map(|&f| a_weighting_db(f)).collect();
    log::debug!(
        "computed {} bins, resolution {} Hz",
        frequencies.len(),
        bin_frequency(1, settings)
    );
    BinVectors::new(frequencies, mic, a_weighting)
}
