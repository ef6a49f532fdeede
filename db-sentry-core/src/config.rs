use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::audio::{BandDefinition, BandId};
use crate::errors::{MyError, MyResult};

/// most bands one session can hold
pub const MAX_BANDS: usize = 8;

/// Loaded once at startup. Reading the file is up to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    pub sample_rate_hz: u32,
    /// 0 = no smoothing. close to 1 = very slow. bands can override this
    pub smoothing: f32,
    /// how often Leq and max are reported and reset
    pub report_interval_ms: u32,
    pub bands: Vec<BandConfig, MAX_BANDS>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    pub band: BandId,
    pub low_hz: f32,
    pub high_hz: f32,
    /// dBFS -> dB SPL. these are device specific
    pub offset_db: f32,
    #[serde(default)]
    pub smoothing: Option<f32>,
}

impl Default for MeterConfig {
    fn default() -> Self {
        let mut bands = Vec::new();

        // TODO: treble is capped by the old 16 kHz boards. raise it once every sensor runs at 48 kHz
        for band in [
            BandConfig::new(BandId::Bass, 20.0, 250.0, 35.0),
            BandConfig::new(BandId::Mid, 250.0, 4000.0, 47.0),
            BandConfig::new(BandId::Treble, 4000.0, 8000.0, 65.0),
        ] {
            // capacity is far above 3
            let _ = bands.push(band);
        }

        Self {
            sample_rate_hz: 48_000,
            smoothing: 0.7,
            report_interval_ms: 1_000,
            bands,
        }
    }
}

impl BandConfig {
    pub const fn new(band: BandId, low_hz: f32, high_hz: f32, offset_db: f32) -> Self {
        Self {
            band,
            low_hz,
            high_hz,
            offset_db,
            smoothing: None,
        }
    }

    pub fn definition(&self, default_smoothing: f32) -> MyResult<BandDefinition> {
        BandDefinition::new(
            self.band,
            self.low_hz,
            self.high_hz,
            self.offset_db,
            self.smoothing.unwrap_or(default_smoothing),
        )
    }
}

impl MeterConfig {
    pub fn band_definitions(&self) -> MyResult<Vec<BandDefinition, MAX_BANDS>> {
        let mut definitions = Vec::new();

        for band in self.bands.iter() {
            definitions
                .push(band.definition(self.smoothing)?)
                .map_err(|_| MyError::TooManyBands {
                    count: self.bands.len(),
                    max: MAX_BANDS,
                })?;
        }

        Ok(definitions)
    }

    pub fn validate(&self) -> MyResult<()> {
        if self.sample_rate_hz == 0 {
            return Err(MyError::SampleRate(self.sample_rate_hz));
        }

        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(MyError::Smoothing(self.smoothing));
        }

        self.band_definitions().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MeterConfig::default();

        config.validate().unwrap();

        let definitions = config.band_definitions().unwrap();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0].band(), BandId::Bass);
        assert_eq!(definitions[1].offset_db(), 47.0);
        assert_eq!(definitions[2].smoothing(), 0.7);
    }

    #[test]
    fn test_parse_toml() {
        let config: MeterConfig = toml::from_str(
            r#"
            sample_rate_hz = 16000
            smoothing = 0.5

            [[bands]]
            band = "bass"
            low_hz = 20.0
            high_hz = 250.0
            offset_db = 35.0

            [[bands]]
            band = "treble"
            low_hz = 4000.0
            high_hz = 8000.0
            offset_db = 65.0
            smoothing = 0.9
            "#,
        )
        .unwrap();

        assert_eq!(config.sample_rate_hz, 16_000);
        // missing fields fall back to the defaults
        assert_eq!(config.report_interval_ms, 1_000);

        let definitions = config.band_definitions().unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].smoothing(), 0.5);
        assert_eq!(definitions[1].band(), BandId::Treble);
        assert_eq!(definitions[1].smoothing(), 0.9);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = MeterConfig::default();
        config.smoothing = 1.0;
        assert_eq!(config.validate(), Err(MyError::Smoothing(1.0)));

        let mut config = MeterConfig::default();
        config.bands[1].smoothing = Some(1.5);
        assert_eq!(config.validate(), Err(MyError::Smoothing(1.5)));

        let mut config = MeterConfig::default();
        config.bands[2].high_hz = 10.0;
        assert_eq!(
            config.validate(),
            Err(MyError::BandCutoffs {
                low_hz: 4000.0,
                high_hz: 10.0
            })
        );

        let mut config = MeterConfig::default();
        config.sample_rate_hz = 0;
        assert_eq!(config.validate(), Err(MyError::SampleRate(0)));

        let mut config = MeterConfig::default();
        config.bands[0].offset_db = f32::NAN;
        assert!(matches!(config.validate(), Err(MyError::CalibrationOffset(x)) if x.is_nan()));

        let unknown_band = toml::from_str::<MeterConfig>(
            r#"
            [[bands]]
            band = "subwoofer"
            low_hz = 20.0
            high_hz = 80.0
            offset_db = 0.0
            "#,
        );
        assert!(unknown_band.is_err());
    }
}
