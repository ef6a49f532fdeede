use thiserror::Error;

/// Everything the core can reject. Quiet signals are floored instead of surfaced here.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MyError {
    #[error("frame has {actual} samples, expected {expected}")]
    FrameLength { expected: usize, actual: usize },
    #[error("band cutoffs must be finite with low < high: {low_hz} Hz .. {high_hz} Hz")]
    BandCutoffs { low_hz: f32, high_hz: f32 },
    #[error("calibration offset must be finite: {0} dB")]
    CalibrationOffset(f32),
    #[error("sample rate must be above 0 Hz")]
    SampleRate(u32),
    #[error("smoothing must be in [0, 1): {0}")]
    Smoothing(f32),
    #[error("{count} bands configured, but a session holds at most {max}")]
    TooManyBands { count: usize, max: usize },
    #[error("i2s buffer has {actual} bytes, expected {expected}")]
    I2sBufferLength { expected: usize, actual: usize },
}

pub type MyResult<T> = Result<T, MyError>;
