use core::f32::consts::PI;

#[allow(unused_imports)]
use micromath::F32Ext;

use super::Window;

/// Symmetric Hamming window: `0.54 - 0.46 * cos(2πi / (N - 1))`.
pub struct HammingWindow<const N: usize>;

impl<const N: usize> Window<N> for HammingWindow<N> {
    fn window(i: usize) -> f32 {
        if N < 2 {
            return 1.0;
        }

        0.54 - 0.46 * (2.0 * PI * i as f32 / (N - 1) as f32).cos()
    }
}
