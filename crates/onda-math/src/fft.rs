//! Fast Fourier transform backed by rustfft.

use std::sync::Arc;

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::transform::{Transform, TransformResult};
use crate::{Error, Result};

/// FFT over power-of-two frames.
///
/// The forward direction is unscaled; the inverse scales by `1/N`, so
/// `inverse(forward(x))` reproduces `x` up to floating-point error. Both
/// directions return full-length real/imaginary pairs, conjugate mirror
/// included.
pub struct Fft {
    num_samples: usize,
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
}

impl Fft {
    /// Plans forward and inverse FFTs for frames of `num_samples` samples.
    ///
    /// `num_samples` must be a positive power of two.
    pub fn new(num_samples: usize) -> Result<Self> {
        if num_samples == 0 || !num_samples.is_power_of_two() {
            return Err(Error::NotPowerOfTwo(num_samples));
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            num_samples,
            forward: planner.plan_fft_forward(num_samples),
            inverse: planner.plan_fft_inverse(num_samples),
        })
    }

    fn check_frame(&self, data: &[f32]) -> Result<()> {
        if data.len() == self.num_samples {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                left: data.len(),
                right: self.num_samples,
            })
        }
    }
}

impl Transform for Fft {
    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn forward(&self, real: &[f32]) -> Result<TransformResult> {
        self.check_frame(real)?;
        let mut buffer: Vec<Complex<f32>> =
            real.iter().map(|&re| Complex::new(re, 0.0)).collect();
        self.forward.process(&mut buffer);
        Ok(split(&buffer))
    }

    fn forward_complex(&self, real: &[f32], imaginary: &[f32]) -> Result<TransformResult> {
        self.check_frame(real)?;
        self.check_frame(imaginary)?;
        let mut buffer = join(real, imaginary);
        self.forward.process(&mut buffer);
        Ok(split(&buffer))
    }

    fn inverse(&self, real: &[f32], imaginary: &[f32]) -> Result<TransformResult> {
        self.check_frame(real)?;
        self.check_frame(imaginary)?;
        let mut buffer = join(real, imaginary);
        self.inverse.process(&mut buffer);
        let scale = 1.0 / self.num_samples as f32;
        for value in &mut buffer {
            *value *= scale;
        }
        Ok(split(&buffer))
    }
}

fn join(real: &[f32], imaginary: &[f32]) -> Vec<Complex<f32>> {
    real.iter()
        .zip(imaginary)
        .map(|(&re, &im)| Complex::new(re, im))
        .collect()
}

fn split(buffer: &[Complex<f32>]) -> TransformResult {
    TransformResult::new_unchecked(
        buffer.iter().map(|c| c.re).collect(),
        buffer.iter().map(|c| c.im).collect(),
    )
}
