//! Check that the microphone is actually clocking data out before trusting its levels.
use crate::audio::i2s::i2s_word_to_i24;
use crate::logging::warn;

#[allow(unused_imports)]
use micromath::F32Ext;

/// 24-bit counts. anything quieter is probably miswired
pub const QUIET_RMS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicHealth {
    /// the read returned nothing. check the clock and pins
    Empty,
    /// every raw word was identical. the mic is not outputting
    Stuck(i32),
    /// alive, but the RMS is below [`QUIET_RMS`]
    Quiet { rms: f32 },
    Alive { rms: f32 },
}

impl MicHealth {
    pub fn is_responding(&self) -> bool {
        matches!(self, Self::Quiet { .. } | Self::Alive { .. })
    }
}

/// classify a block of raw I2S words (not normalized samples)
pub fn check_words(words: &[i32]) -> MicHealth {
    let Some(&first) = words.first() else {
        warn!("no samples from the microphone");
        return MicHealth::Empty;
    };

    if words.iter().all(|&w| w == first) {
        warn!("all microphone samples identical ({}). mic likely not outputting", first);
        return MicHealth::Stuck(first);
    }

    let sum_sq: f64 = words
        .iter()
        .map(|&w| {
            let s = i2s_word_to_i24(w) as f64;
            s * s
        })
        .sum();

    let rms = ((sum_sq / words.len() as f64) as f32).sqrt();

    if rms < QUIET_RMS {
        warn!("very low microphone rms: {}", rms);
        MicHealth::Quiet { rms }
    } else {
        MicHealth::Alive { rms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_check_words() {
        assert_eq!(check_words(&[]), MicHealth::Empty);
        assert_eq!(check_words(&[0; 512]), MicHealth::Stuck(0));
        assert_eq!(check_words(&[-1; 512]), MicHealth::Stuck(-1));

        // a few counts of noise in the top 24 bits
        let quiet: [i32; 4] = [1 << 8, -(1 << 8), 2 << 8, -(2 << 8)];
        let health = check_words(&quiet);
        assert!(matches!(health, MicHealth::Quiet { .. }), "{health:?}");
        assert!(health.is_responding());

        let loud: [i32; 4] = [1000 << 8, -(1000 << 8), 1000 << 8, -(1000 << 8)];
        assert_eq!(check_words(&loud), MicHealth::Alive { rms: 1000.0 });

        assert!(!MicHealth::Stuck(0).is_responding());
        assert!(!MicHealth::Empty.is_responding());
    }
}
