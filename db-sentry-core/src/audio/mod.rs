//! Audio processing
//!
//! Frame -> SpectralTransform (window + FFT) -> Spectrum -> BandAnalyzer -> smoothed dB SPL -> Leq/max per report
pub mod band;
pub mod decibels;
pub mod health;
pub mod i2s;
pub mod spectrum;
pub mod transform;

#[allow(unused_imports)]
use micromath::F32Ext;

/// center frequency of a bin. `num_bins` is half the frame length
pub fn bin_to_frequency(bin_index: usize, sample_rate_hz: u32, num_bins: usize) -> f32 {
    (bin_index as f32) * (sample_rate_hz as f32) / ((num_bins * 2) as f32)
}

/// `floor(freq / (sample_rate / frame_len))`. NOT clamped. see [`Spectrum::freq_to_bin`]
///
/// negative and NaN frequencies map to bin 0
pub fn frequency_to_bin(freq_hz: f32, sample_rate_hz: u32, frame_len: usize) -> usize {
    let bin_width = sample_rate_hz as f32 / frame_len as f32;

    // float to int casts saturate
    (freq_hz / bin_width).floor() as usize
}

pub use band::{BandAnalyzer, BandDefinition, BandId, BinRange};
pub use decibels::{SILENCE_FLOOR_DB, amplitude_to_db, db_to_power, power_to_db};
pub use health::MicHealth;
pub use spectrum::Spectrum;
pub use transform::{MicroFft, RealFft, SpectralTransform};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_to_frequency() {
        assert_eq!(bin_to_frequency(0, 48_000, 512), 0.0);
        assert_eq!(bin_to_frequency(5, 48_000, 512), 234.375);
        assert_eq!(frequency_to_bin(bin_to_frequency(37, 48_000, 512), 48_000, 1024), 37);
    }
}
