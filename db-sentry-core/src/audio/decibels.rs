#[allow(unused_imports)]
use micromath::F32Ext;

/// what an empty band or an empty Leq window reads as. not a clamp on real levels
pub const SILENCE_FLOOR_DB: f32 = -160.0;

/// magnitudes are floored here before taking a logarithm. -240 dB
pub const MAGNITUDE_EPSILON: f32 = 1e-12;

/// 20 * log10 of an amplitude (magnitude or RMS). never returns -inf or NaN for non-negative input.
#[inline]
pub fn amplitude_to_db(x: f32) -> f32 {
    debug_assert!(x >= 0.0 || x.is_nan());

    let x = if x >= MAGNITUDE_EPSILON { x } else { MAGNITUDE_EPSILON };

    20.0 * x.log10()
}

/// 10 * log10 of a linear power. powers that underflowed to 0 read as about -380 dB instead of -inf
#[inline]
pub fn power_to_db(x: f32) -> f32 {
    let x = if x >= f32::MIN_POSITIVE { x } else { f32::MIN_POSITIVE };

    10.0 * x.log10()
}

/// reminder, adding these is the same as averaging energy. adding decibels is not!
#[inline]
pub fn db_to_power(db: f32) -> f32 {
    10.0f32.powf(db / 10.0)
}
