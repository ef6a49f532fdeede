//! Drive one transform and a handful of bands from a single thread.
//!
//! Per frame: transform, then every band smooths its level.
//! Per report interval: read Leq and max from every band, publish them, reset the windows.
//! Acquisition and transport are the host's problem. They plug in through [`FrameSource`] and [`Reporter`].
use heapless::Vec;

use crate::audio::{BandAnalyzer, BandDefinition, BandId, MicroFft, RealFft, SpectralTransform};
use crate::config::{MAX_BANDS, MeterConfig};
use crate::errors::{MyError, MyResult};
use crate::logging::{debug, info, warn};
use crate::windows::{HammingWindow, Window};

#[cfg(any(feature = "std", feature = "embassy"))]
use crate::report_timer::{Instant, ReportTimer};

/// 1024 samples, hamming window
pub type DefaultMeterSession = MeterSession<1024, 512, HammingWindow<1024>>;

/// one band's smoothed level for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandLevel {
    pub band: BandId,
    pub db: f32,
}

pub type BandLevels = Vec<BandLevel, MAX_BANDS>;

/// one band's aggregates for one reporting interval
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandReport {
    pub band: BandId,
    pub leq_db: f32,
    pub max_db: f32,
}

/// Where frames come from. Probably a blocking microphone read.
pub trait FrameSource {
    /// `None` when no frame arrived this iteration (a read timeout). the bands are left alone
    fn read_frame(&mut self) -> Option<&[f32]>;
}

/// Where reports go. Retries and connection handling belong in here, not in the session.
pub trait Reporter {
    fn publish(&mut self, report: &BandReport);
}

impl<F: FnMut(&BandReport)> Reporter for F {
    fn publish(&mut self, report: &BandReport) {
        self(report)
    }
}

/// publish reports to the log
pub struct LogReporter;

impl Reporter for LogReporter {
    fn publish(&mut self, report: &BandReport) {
        info!(
            "{}: leq={} dB max={} dB",
            report.band.name(),
            report.leq_db,
            report.max_db
        );
    }
}

/// what one [`MeterSession::poll`] did
#[derive(Debug, Default, PartialEq)]
pub struct PollOutcome {
    /// `None` when the source timed out. `Some(Err(_))` when its frame was rejected
    pub levels: Option<MyResult<BandLevels>>,
    pub reported: bool,
}

pub struct MeterSession<const IN: usize, const OUT: usize, W: Window<IN>> {
    transform: SpectralTransform<IN, OUT, W>,
    bands: Vec<BandAnalyzer, MAX_BANDS>,
}

impl<const IN: usize, const OUT: usize, W: Window<IN>> MeterSession<IN, OUT, W>
where
    MicroFft: RealFft<IN, OUT>,
{
    pub fn new(sample_rate_hz: u32, definitions: &[BandDefinition]) -> MyResult<Self> {
        if sample_rate_hz == 0 {
            return Err(MyError::SampleRate(sample_rate_hz));
        }

        if definitions.len() > MAX_BANDS {
            return Err(MyError::TooManyBands {
                count: definitions.len(),
                max: MAX_BANDS,
            });
        }

        let transform = SpectralTransform::new(sample_rate_hz);

        let mut bands = Vec::new();
        for &definition in definitions {
            let band = BandAnalyzer::new(definition);

            info!(
                "{}: {}-{} Hz = bins {:?}. offset {} dB. smoothing {}",
                definition.band().name(),
                definition.low_hz(),
                definition.high_hz(),
                band.bin_range(&transform.spectrum()),
                definition.offset_db(),
                definition.smoothing()
            );

            // length was checked above
            let _ = bands.push(band);
        }

        Ok(Self { transform, bands })
    }

    pub fn from_config(config: &MeterConfig) -> MyResult<Self> {
        config.validate()?;

        let definitions = config.band_definitions()?;

        Self::new(config.sample_rate_hz, &definitions)
    }

    #[inline]
    pub fn transform(&self) -> &SpectralTransform<IN, OUT, W> {
        &self.transform
    }

    #[inline]
    pub fn bands(&self) -> &[BandAnalyzer] {
        &self.bands
    }

    pub fn band(&self, band: BandId) -> Option<&BandAnalyzer> {
        self.bands.iter().find(|x| x.band() == band)
    }

    /// Transform the frame and update every band.
    ///
    /// A frame of the wrong length is rejected and every band keeps its state.
    pub fn process_frame(&mut self, frame: &[f32]) -> MyResult<BandLevels> {
        self.transform.process(frame)?;

        let spectrum = self.transform.spectrum();

        let mut levels = BandLevels::new();

        // the bands are independent. order doesn't matter
        for band in self.bands.iter_mut() {
            let db = band.compute_smoothed_level(&spectrum);

            let _ = levels.push(BandLevel {
                band: band.band(),
                db,
            });
        }

        Ok(levels)
    }

    /// Publish every band's Leq and max, then start a new window.
    pub fn report<R: Reporter>(&mut self, reporter: &mut R) {
        for band in self.bands.iter_mut() {
            let report = BandReport {
                band: band.band(),
                leq_db: band.leq_level(),
                max_db: band.max_level(),
            };

            debug!(
                "{}: {} frames. leq={} max={}",
                report.band.name(),
                band.sample_count(),
                report.leq_db,
                report.max_db
            );

            reporter.publish(&report);

            band.reset_spl_computation();
        }
    }

    /// One pass of the cooperative loop: process a frame if one is ready, then report if the interval is up.
    ///
    /// A rejected frame only skips that frame. The report check runs either way.
    #[cfg(any(feature = "std", feature = "embassy"))]
    pub fn poll<S: FrameSource, R: Reporter>(
        &mut self,
        source: &mut S,
        reporter: &mut R,
        timer: &mut ReportTimer,
        now: Instant,
    ) -> PollOutcome {
        let levels = source.read_frame().map(|frame| self.process_frame(frame));

        if let Some(Err(err)) = &levels {
            warn!("skipped frame: {}", err);
        }

        let reported = timer.is_due(now);
        if reported {
            self.report(reporter);
        }

        PollOutcome { levels, reported }
    }
}
