//! Discrete cosine transform computed through a same-size FFT.
//!
//! Frames are reordered (even-index samples first, odd-index samples
//! mirrored into the back half), run through the FFT obtained from
//! [`fft_transforms`](crate::factory::fft_transforms), and rotated by
//! per-bin phase factors. The output equals twice the conventional DCT-II
//! of the frame; callers compensating against textbook values must halve
//! the coefficients.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::factory::TransformFactory;
use crate::transform::{Transform, TransformResult};
use crate::{Error, Result};

/// Per-bin rotation applied to the FFT of the reordered frame.
struct PhaseFactors {
    cos: Vec<f32>,
    sin: Vec<f32>,
}

impl PhaseFactors {
    fn new(num_samples: usize) -> Self {
        let n = num_samples as f64;
        let mut cos = Vec::with_capacity(num_samples);
        let mut sin = Vec::with_capacity(num_samples);
        for k in 0..num_samples {
            let angle = -PI * k as f64 / (2.0 * n);
            cos.push(angle.cos() as f32);
            sin.push(angle.sin() as f32);
        }
        Self { cos, sin }
    }
}

/// Returns the shared factor table for `num_samples`, computing it on first
/// request. Entries are kept for the life of the process; the set of
/// distinct frame sizes stays small in practice.
fn phase_factors(num_samples: usize) -> Arc<PhaseFactors> {
    static FACTORS: OnceLock<Mutex<HashMap<usize, Arc<PhaseFactors>>>> = OnceLock::new();
    let cache = FACTORS.get_or_init(|| Mutex::new(HashMap::new()));
    Arc::clone(
        cache
            .lock()
            .entry(num_samples)
            .or_insert_with(|| Arc::new(PhaseFactors::new(num_samples))),
    )
}

/// Forward DCT over frames of a fixed power-of-two length.
///
/// The inverse direction is not provided; [`Transform::inverse`] reports
/// [`Error::UnsupportedInverse`].
pub struct Dct {
    num_samples: usize,
    fft: Arc<dyn Transform>,
    factors: Arc<PhaseFactors>,
}

impl Dct {
    /// Creates a DCT for frames of `num_samples` samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPowerOfTwo`] unless `num_samples` is a positive
    /// power of two.
    pub fn new(num_samples: usize) -> Result<Self> {
        if num_samples == 0 || !num_samples.is_power_of_two() {
            return Err(Error::NotPowerOfTwo(num_samples));
        }
        Ok(Self {
            num_samples,
            fft: crate::factory::fft_transforms().create(num_samples)?,
            factors: phase_factors(num_samples),
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

impl Transform for Dct {
    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn forward(&self, real: &[f32]) -> Result<TransformResult> {
        self.check_frame(real)?;
        let mut reordered = vec![0.0; self.num_samples];
        for (i, &sample) in real.iter().enumerate() {
            if i % 2 == 0 {
                reordered[i / 2] = sample;
            } else {
                reordered[self.num_samples - 1 - i / 2] = sample;
            }
        }
        let spectrum = self.fft.forward(&reordered)?;
        let (re, im) = (spectrum.real(), spectrum.imaginary());
        let mut coefficients = Vec::with_capacity(self.num_samples);
        for k in 0..self.num_samples {
            coefficients.push(2.0 * (re[k] * self.factors.cos[k] - im[k] * self.factors.sin[k]));
        }
        Ok(TransformResult::new_unchecked(
            coefficients,
            vec![0.0; self.num_samples],
        ))
    }

    /// The imaginary part only has its length validated; its values do not
    /// contribute to the coefficients.
    fn forward_complex(&self, real: &[f32], imaginary: &[f32]) -> Result<TransformResult> {
        self.check_frame(imaginary)?;
        self.forward(real)
    }

    fn inverse(&self, _real: &[f32], _imaginary: &[f32]) -> Result<TransformResult> {
        Err(Error::UnsupportedInverse { transform: "dct" })
    }
}
