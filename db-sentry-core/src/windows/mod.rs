mod flat;
mod hamming;

pub use flat::FlatWindow;
pub use hamming::HammingWindow;

/// A window function applied to a frame before the FFT.
///
/// The weights are not compensated for coherent gain. Calibration offsets on the bands absorb that.
pub trait Window<const N: usize> {
    fn window(i: usize) -> f32;

    /// precompute every weight so the hot path is a single multiply per sample
    fn windows() -> [f32; N] {
        let mut window = [0.0; N];

        for (i, weight) in window.iter_mut().enumerate() {
            *weight = Self::window(i);
        }

        window
    }
}
