use super::frequency_to_bin;

/// A borrowed magnitude spectrum: bin `i` is `i * sample_rate / frame_len` Hz.
///
/// Bands read the transform's buffer through this instead of holding a reference to the transform,
/// so several sessions can coexist and tests can hand-build spectra.
#[derive(Clone, Copy, Debug)]
pub struct Spectrum<'a> {
    magnitudes: &'a [f32],
    sample_rate_hz: u32,
}

impl<'a> Spectrum<'a> {
    /// `magnitudes` must be exactly half a frame long
    pub fn new(magnitudes: &'a [f32], sample_rate_hz: u32) -> Self {
        debug_assert!(!magnitudes.is_empty());
        debug_assert!(sample_rate_hz > 0);

        Self {
            magnitudes,
            sample_rate_hz,
        }
    }

    #[inline]
    pub fn magnitudes(&self) -> &'a [f32] {
        self.magnitudes
    }

    #[inline]
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.magnitudes.len()
    }

    #[inline]
    pub fn frame_len(&self) -> usize {
        self.magnitudes.len() * 2
    }

    #[inline]
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.frame_len() as f32
    }

    /// floor the frequency to a bin, then clamp it to `[0, bin_count - 1]`
    #[inline]
    pub fn freq_to_bin(&self, freq_hz: f32) -> usize {
        let bin = frequency_to_bin(freq_hz, self.sample_rate_hz, self.frame_len());

        bin.min(self.bin_count().saturating_sub(1))
    }
}
