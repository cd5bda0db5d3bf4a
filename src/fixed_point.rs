/// Scale for squared (power) quantities: 6 dB is roughly 3.98.
pub fn db_to_power_scale(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Q-format with `fractional_bits` behind the point. Truncates toward zero,
/// the firmware multiplies with these words directly and expects that.
/// Values outside the `u64` range saturate.
pub fn to_fixed_point(linear: f64, fractional_bits: u32) -> u64 {
    (linear * 2f64.powi(fractional_bits as i32)).trunc() as u64
}

pub fn db_to_fixed_point(db: f64, fractional_bits: u32) -> u64 {
    to_fixed_point(db_to_power_scale(db), fractional_bits)
}
