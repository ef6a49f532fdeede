//! Per-band sound level: calibrated dB SPL, exponential smoothing, Leq and peak.
//!
//! The smoothing runs in the dB domain because that is how a meter needle settles.
//! Leq has to average power, so the accumulator runs in the linear energy domain and only becomes dB when it is read.
//! Averaging the dB values directly would bias every window toward its quiet moments.
use core::fmt;

use serde::{Deserialize, Serialize};

use super::decibels::{SILENCE_FLOOR_DB, amplitude_to_db, db_to_power, power_to_db};
use super::spectrum::Spectrum;
use crate::errors::{MyError, MyResult};
use crate::logging::trace;

#[allow(unused_imports)]
use micromath::F32Ext;

/// The bands a meter reports. fixed when the config is loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum BandId {
    Bass,
    Mid,
    Treble,
}

impl BandId {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bass => "bass",
            Self::Mid => "mid",
            Self::Treble => "treble",
        }
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// immutable after construction
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandDefinition {
    band: BandId,
    low_hz: f32,
    high_hz: f32,
    /// maps dBFS to dB SPL. `known_spl_at_calibration - measured_dbfs_at_calibration`
    offset_db: f32,
    /// 0 = no smoothing. close to 1 = very slow
    smoothing: f32,
}

impl BandDefinition {
    pub fn new(
        band: BandId,
        low_hz: f32,
        high_hz: f32,
        offset_db: f32,
        smoothing: f32,
    ) -> MyResult<Self> {
        if !(low_hz.is_finite() && high_hz.is_finite() && low_hz < high_hz) {
            return Err(MyError::BandCutoffs { low_hz, high_hz });
        }

        if !offset_db.is_finite() {
            return Err(MyError::CalibrationOffset(offset_db));
        }

        if !(0.0..1.0).contains(&smoothing) {
            return Err(MyError::Smoothing(smoothing));
        }

        Ok(Self {
            band,
            low_hz,
            high_hz,
            offset_db,
            smoothing,
        })
    }

    #[inline]
    pub fn band(&self) -> BandId {
        self.band
    }

    #[inline]
    pub fn low_hz(&self) -> f32 {
        self.low_hz
    }

    #[inline]
    pub fn high_hz(&self) -> f32 {
        self.high_hz
    }

    #[inline]
    pub fn offset_db(&self) -> f32 {
        self.offset_db
    }

    #[inline]
    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }
}

/// inclusive range of spectrum bins
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinRange {
    pub low: usize,
    pub high: usize,
}

impl BinRange {
    #[inline]
    pub fn len(&self) -> usize {
        (self.high + 1).saturating_sub(self.low)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn bins<'a>(&self, spectrum: &Spectrum<'a>) -> &'a [f32] {
        &spectrum.magnitudes()[self.low..=self.high]
    }
}

/// One frequency band's definition and its running state.
///
/// Only [`compute_smoothed_level`](Self::compute_smoothed_level) and
/// [`reset_spl_computation`](Self::reset_spl_computation) mutate anything.
#[derive(Clone, Debug)]
pub struct BandAnalyzer {
    definition: BandDefinition,
    /// smoothed dB from the last frame. survives resets
    previous_db: f32,
    /// sum of `10^(dB/10)` since the last reset
    sum_linear: f64,
    sample_count: u64,
    max_db: f32,
}

impl BandAnalyzer {
    pub fn new(definition: BandDefinition) -> Self {
        Self {
            definition,
            previous_db: 0.0,
            sum_linear: 0.0,
            sample_count: 0,
            max_db: SILENCE_FLOOR_DB,
        }
    }

    #[inline]
    pub fn definition(&self) -> &BandDefinition {
        &self.definition
    }

    #[inline]
    pub fn band(&self) -> BandId {
        self.definition.band
    }

    /// the smoothing filter's state
    #[inline]
    pub fn previous_level(&self) -> f32 {
        self.previous_db
    }

    /// frames accumulated since the last reset
    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// `floor(freq / bin_width)` clamped to the spectrum. nothing is cached
    #[inline]
    pub fn freq_to_bin(&self, freq_hz: f32, spectrum: &Spectrum<'_>) -> usize {
        spectrum.freq_to_bin(freq_hz)
    }

    /// Resolve the cutoffs to bins.
    ///
    /// Bin 0 (DC) is never included and the range always spans at least two bins when the spectrum has three or more.
    /// Cutoffs closer than a bin width or past Nyquist still give a usable band.
    pub fn bin_range(&self, spectrum: &Spectrum<'_>) -> BinRange {
        let last = spectrum.bin_count().saturating_sub(1);

        let low = self.freq_to_bin(self.definition.low_hz, spectrum).max(1);

        let high = self
            .freq_to_bin(self.definition.high_hz, spectrum)
            .max(low + 1)
            .min(last);

        // a low cutoff up at nyquist would collapse to one bin. slide it down instead
        let low = low.min(high.saturating_sub(1)).max(1);

        BinRange { low, high }
    }

    /// Uncalibrated level: `20 * log10(mean magnitude)`.
    ///
    /// This is relative metering only. It does not share math with [`compute_spl_band_level`](Self::compute_spl_band_level) on purpose.
    pub fn compute_band_level(&self, spectrum: &Spectrum<'_>) -> f32 {
        let range = self.bin_range(spectrum);

        if range.is_empty() {
            return SILENCE_FLOOR_DB;
        }

        let sum: f32 = range.bins(spectrum).iter().sum();

        let avg = sum / range.len() as f32;

        amplitude_to_db(avg)
    }

    /// Calibrated level: RMS of the band's magnitudes in dBFS, plus the calibration offset.
    ///
    /// A silent band reads `-240 + offset`, the epsilon floor. Only an empty bin range reads [`SILENCE_FLOOR_DB`].
    pub fn compute_spl_band_level(&self, spectrum: &Spectrum<'_>) -> f32 {
        let range = self.bin_range(spectrum);

        if range.is_empty() {
            return SILENCE_FLOOR_DB;
        }

        let sum_sq: f32 = range.bins(spectrum).iter().map(|m| m * m).sum();

        let rms = (sum_sq / range.len() as f32).sqrt();

        let dbfs = amplitude_to_db(rms);

        dbfs + self.definition.offset_db
    }

    /// Smooth the calibrated level and fold it into the Leq and max aggregates.
    ///
    /// returns the smoothed dB SPL
    pub fn compute_smoothed_level(&mut self, spectrum: &Spectrum<'_>) -> f32 {
        let current = self.compute_spl_band_level(spectrum);

        // same as `a * previous + (1 - a) * current`, but this form can't round past `current`
        let smoothed = current + self.definition.smoothing * (self.previous_db - current);

        self.previous_db = smoothed;

        self.sum_linear += f64::from(db_to_power(smoothed));
        self.sample_count += 1;

        if smoothed > self.max_db {
            self.max_db = smoothed;
        }

        trace!(
            "{}: current={} smoothed={}",
            self.definition.band.name(),
            current,
            smoothed
        );

        smoothed
    }

    /// energy average of the smoothed levels since the last reset
    pub fn leq_level(&self) -> f32 {
        if self.sample_count == 0 {
            return SILENCE_FLOOR_DB;
        }

        let avg_linear = self.sum_linear / self.sample_count as f64;

        power_to_db(avg_linear as f32)
    }

    /// loudest smoothed level since the last reset
    #[inline]
    pub fn max_level(&self) -> f32 {
        self.max_db
    }

    /// Start a new reporting window. The smoothing state keeps going.
    pub fn reset_spl_computation(&mut self) {
        self.sum_linear = 0.0;
        self.sample_count = 0;
        self.max_db = SILENCE_FLOOR_DB;
    }
}
