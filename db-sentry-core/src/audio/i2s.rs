//! MEMS microphones send 24-bit samples left-justified in 32-bit I2S words.
use crate::errors::{MyError, MyResult};

/// 2^23
const I24_MAX: f32 = (1 << 23) as f32;

/// drop the padding byte (arithmetic shift keeps the sign) and scale to roughly -1..1
#[inline]
pub fn i2s_word_to_i24(raw: i32) -> i32 {
    raw >> 8
}

#[inline]
pub fn normalize_i2s_word(raw: i32) -> f32 {
    i2s_word_to_i24(raw) as f32 / I24_MAX
}

pub fn parse_i2s_words(buf: &[u8]) -> impl Iterator<Item = i32> + '_ {
    buf.chunks_exact(4)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Fill a frame from a little-endian DMA buffer.
///
/// The buffer has to hold exactly one word per sample. A short read is rejected instead of leaving stale samples in the frame.
pub fn parse_i2s_words_into(buf: &[u8], frame: &mut [f32]) -> MyResult<()> {
    let expected = frame.len() * 4;

    if buf.len() != expected {
        return Err(MyError::I2sBufferLength {
            expected,
            actual: buf.len(),
        });
    }

    for (x, word) in frame.iter_mut().zip(parse_i2s_words(buf)) {
        *x = normalize_i2s_word(word);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_i2s_word(0), 0.0);
        // full scale positive. the low byte is padding
        assert_eq!(normalize_i2s_word(0x7FFF_FF00), (I24_MAX - 1.0) / I24_MAX);
        assert_eq!(normalize_i2s_word(0x7FFF_FFFF), (I24_MAX - 1.0) / I24_MAX);
        // full scale negative
        assert_eq!(normalize_i2s_word(i32::MIN), -1.0);
        assert_eq!(normalize_i2s_word(-256), -1.0 / I24_MAX);
        assert_eq!(normalize_i2s_word(0x4000_0000), 0.5);
    }

    #[test]
    fn test_parse_into() {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&0x4000_0000i32.to_le_bytes());
        buf[4..].copy_from_slice(&(-0x4000_0000i32).to_le_bytes());

        let mut frame = [9.0; 2];
        parse_i2s_words_into(&buf, &mut frame).unwrap();

        assert_eq!(frame, [0.5, -0.5]);
    }

    #[test]
    fn test_short_read_is_rejected() {
        let mut frame = [9.0; 4];

        assert_eq!(
            parse_i2s_words_into(&[0u8; 12], &mut frame),
            Err(MyError::I2sBufferLength {
                expected: 16,
                actual: 12
            })
        );
        assert_eq!(frame, [9.0; 4]);
    }
}
