use core::marker::PhantomData;

use microfft::Complex32;

use super::spectrum::Spectrum;
use crate::errors::{MyError, MyResult};
use crate::logging::{info, trace};
use crate::windows::Window;

#[allow(unused_imports)]
use micromath::F32Ext;

/// Window a frame, run a real FFT over it, and keep the magnitude of every bin.
///
/// IN = samples per frame. OUT = IN / 2 magnitudes.
/// The scratch buffers are reused for every frame. Nothing else survives between calls.
pub struct SpectralTransform<const IN: usize, const OUT: usize, W: Window<IN>> {
    sample_rate_hz: u32,
    fft_buf: [f32; IN],
    window_multipliers: [f32; IN],
    magnitudes: [f32; OUT],
    window: PhantomData<W>,
}

impl<const IN: usize, const OUT: usize, W: Window<IN>> SpectralTransform<IN, OUT, W> {
    /// Panics if `sample_rate_hz` is 0. [`MeterConfig::validate`](crate::config::MeterConfig::validate) catches that first.
    pub fn new(sample_rate_hz: u32) -> Self {
        const { assert!(IN >= 4 && IN.is_power_of_two() && IN / 2 == OUT) };

        assert!(sample_rate_hz > 0);

        let x = Self {
            sample_rate_hz,
            fft_buf: [0.0; IN],
            window_multipliers: W::windows(),
            magnitudes: [0.0; OUT],
            window: PhantomData,
        };

        info!(
            "spectral transform: {} samples at {} Hz. bin width = {} Hz",
            IN,
            sample_rate_hz,
            x.spectrum().bin_width_hz()
        );

        x
    }

    #[inline]
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    #[inline]
    pub const fn frame_len(&self) -> usize {
        IN
    }

    /// the magnitudes from the most recent [`process`](Self::process). all zeroes before the first frame
    #[inline]
    pub fn spectrum(&self) -> Spectrum<'_> {
        Spectrum::new(&self.magnitudes, self.sample_rate_hz)
    }

    /// copy the frame into the fft buffer and apply the window.
    /// a frame of the wrong size is rejected before anything is touched. padding or truncating would shift every bin
    fn fill_fft_buf_with_windows(&mut self, frame: &[f32]) -> MyResult<()> {
        if frame.len() != IN {
            return Err(MyError::FrameLength {
                expected: IN,
                actual: frame.len(),
            });
        }

        self.fft_buf.copy_from_slice(frame);

        for (x, w) in self.fft_buf.iter_mut().zip(self.window_multipliers.iter()) {
            *x *= w;
        }

        Ok(())
    }

    /// transform one frame. read the result with [`spectrum`](Self::spectrum)
    pub fn process(&mut self, frame: &[f32]) -> MyResult<()>
    where
        MicroFft: RealFft<IN, OUT>,
    {
        self.fill_fft_buf_with_windows(frame)?;

        let spectrum = <MicroFft as RealFft<IN, OUT>>::rfft(&mut self.fft_buf);

        // the real-valued coefficient at the Nyquist frequency is packed into the imaginary part of the DC bin
        spectrum[0].im = 0.0;

        for (m, c) in self.magnitudes.iter_mut().zip(spectrum.iter()) {
            *m = c.norm_sqr().sqrt();
        }

        trace!("dc bin: {}", self.magnitudes[0]);

        Ok(())
    }
}

/// A real-input FFT of a fixed size. the output is packed like microfft's
pub trait RealFft<const IN: usize, const OUT: usize> {
    fn rfft(input: &mut [f32; IN]) -> &mut [Complex32; OUT];
}

pub struct MicroFft;

/// microfft only has fixed size functions
macro_rules! impl_real_fft {
    ($in_size:expr, $rfft:ident) => {
        impl RealFft<{ $in_size }, { $in_size / 2 }> for MicroFft {
            #[inline]
            fn rfft(input: &mut [f32; $in_size]) -> &mut [Complex32; $in_size / 2] {
                microfft::real::$rfft(input)
            }
        }
    };
}

impl_real_fft!(256, rfft_256);
impl_real_fft!(512, rfft_512);
impl_real_fft!(1024, rfft_1024);
impl_real_fft!(2048, rfft_2048);
impl_real_fft!(4096, rfft_4096);
