/// One digitized sample of a microphone datasheet curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    pub frequency: f64,
    pub response: f64,
}

/// Measured microphone response, frequencies strictly ascending.
#[derive(Debug, Clone)]
pub struct MicResponse {
    points: Vec<SpectrumPoint>,
}

impl MicResponse {
    /// Returns `None` for an empty sequence. Ordering is checked by the loader.
    pub fn new(points: Vec<SpectrumPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(MicResponse { points })
    }

    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    /// Piecewise-linear lookup, clamped to the first and last sample outside
    /// the measured range.
    pub fn response_at(&self, frequency: f64) -> f64 {
        match self.points.iter().position(|p| p.frequency >= frequency) {
            Some(0) => self.points[0].response,
            Some(index) => {
                let prev = &self.points[index - 1];
                let next = &self.points[index];
                let span = next.frequency - prev.frequency;
                ((frequency - prev.frequency) / span) * next.response
                    + ((next.frequency - frequency) / span) * prev.response
            }
            None => self.points[self.points.len() - 1].response,
        }
    }

    pub fn interpolate(&self, target_freqs: &[f64]) -> Vec<f64> {
        target_freqs.iter().map(|&f| self.response_at(f)).collect()
    }
}

/// Everything computed per bin, kept in decibels until an emitter needs the
/// linear scale.
#[derive(Debug, Clone, PartialEq)]
pub struct BinVectors {
    pub frequencies: Vec<f64>,
    pub mic_response: Vec<f64>,
    pub a_weighting: Vec<f64>,
    pub correction: Vec<f64>,
}

impl BinVectors {
    pub fn new(frequencies: Vec<f64>, mic_response: Vec<f64>, a_weighting: Vec<f64>) -> Self {
        let correction = a_weighting
            .iter()
            .zip(&mic_response)
            .map(|(a, mic)| a - mic)
            .collect();
        BinVectors {
            frequencies,
            mic_response,
            a_weighting,
            correction,
        }
    }

    pub fn len(&self) -> usize {
        self.correction.len()
    }
}
