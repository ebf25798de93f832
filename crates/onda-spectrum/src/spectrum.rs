//! Spectral frames over the positive-frequency half of a transform.

use onda_math::{TransformFactory, TransformResult, fft_transforms, vector};

use crate::Result;

/// Read access shared by all spectrum flavors.
///
/// `powers`, `magnitudes`, and `frequencies` describe the same bins in the
/// same order, sorted by ascending frequency. `real` and `imaginary` expose
/// the underlying data, whose length may exceed the bin count: a linear
/// spectrum keeps the full mirrored transform output.
pub trait Spectrum {
    /// Index of the first sample frame of the window this spectrum was
    /// computed from.
    fn frame_number(&self) -> u64;

    /// Real part of the underlying data.
    fn real(&self) -> &[f32];

    /// Imaginary part of the underlying data.
    fn imaginary(&self) -> &[f32];

    /// Per-bin power.
    fn powers(&self) -> &[f32];

    /// Per-bin magnitude, the square root of the power.
    fn magnitudes(&self) -> &[f32];

    /// Frequency in Hz each bin stands for.
    fn frequencies(&self) -> &[f32];

    /// The bin covering `frequency`, or `None` outside the covered range.
    fn bin(&self, frequency: f32) -> Option<usize>;
}

/// Spectrum of one frame as produced by a forward FFT.
///
/// Keeps the full complex transform output but reports powers, magnitudes,
/// and frequencies for the positive half only; for real input the upper
/// half mirrors the lower. Bin `i` stands for `i · sample_rate / N` Hz.
#[derive(Debug, Clone)]
pub struct LinearSpectrum {
    frame_number: u64,
    real: Vec<f32>,
    imaginary: Vec<f32>,
    powers: Vec<f32>,
    magnitudes: Vec<f32>,
    frequencies: Vec<f32>,
    sample_rate: f32,
}

impl LinearSpectrum {
    /// Builds a spectrum from raw transform output.
    ///
    /// # Errors
    ///
    /// Fails when `real` and `imaginary` differ in length.
    pub fn new(
        frame_number: u64,
        real: Vec<f32>,
        imaginary: Vec<f32>,
        sample_rate: f32,
    ) -> Result<Self> {
        if real.len() != imaginary.len() {
            return Err(onda_math::Error::LengthMismatch {
                left: real.len(),
                right: imaginary.len(),
            }
            .into());
        }
        Ok(Self::precompute(frame_number, real, imaginary, sample_rate))
    }

    /// Builds a spectrum from a forward transform result.
    pub fn from_result(frame_number: u64, result: TransformResult, sample_rate: f32) -> Self {
        let (real, imaginary) = result.into_parts();
        Self::precompute(frame_number, real, imaginary, sample_rate)
    }

    /// Transforms one frame through the shared FFT provider, zero-padding
    /// it to a power of two first.
    ///
    /// # Errors
    ///
    /// Fails on an empty frame.
    pub fn from_samples(frame_number: u64, samples: &[f32], sample_rate: f32) -> Result<Self> {
        let padded = vector::zero_pad(samples, 0);
        let fft = fft_transforms().create(padded.len())?;
        let result = fft.forward(&padded)?;
        Ok(Self::from_result(frame_number, result, sample_rate))
    }

    fn precompute(frame_number: u64, real: Vec<f32>, imaginary: Vec<f32>, sample_rate: f32) -> Self {
        let len = real.len();
        let half = len / 2;
        let mut powers = Vec::with_capacity(half);
        let mut magnitudes = Vec::with_capacity(half);
        let mut frequencies = Vec::with_capacity(half);
        for i in 0..half {
            let power = real[i] * real[i] + imaginary[i] * imaginary[i];
            powers.push(power);
            magnitudes.push(power.sqrt());
            frequencies.push(i as f32 * sample_rate / len as f32);
        }
        Self {
            frame_number,
            real,
            imaginary,
            powers,
            magnitudes,
            frequencies,
            sample_rate,
        }
    }

    /// Number of samples in the transformed frame.
    pub fn num_samples(&self) -> usize {
        self.real.len()
    }

    /// Sample rate of the source signal in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// A spectrum with the same frame number and sample rate over new
    /// transform data.
    ///
    /// # Errors
    ///
    /// Fails when `real` and `imaginary` differ in length.
    pub fn derive(&self, real: Vec<f32>, imaginary: Vec<f32>) -> Result<Self> {
        Self::new(self.frame_number, real, imaginary, self.sample_rate)
    }
}

impl Spectrum for LinearSpectrum {
    fn frame_number(&self) -> u64 {
        self.frame_number
    }

    fn real(&self) -> &[f32] {
        &self.real
    }

    fn imaginary(&self) -> &[f32] {
        &self.imaginary
    }

    fn powers(&self) -> &[f32] {
        &self.powers
    }

    fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    fn bin(&self, frequency: f32) -> Option<usize> {
        if !frequency.is_finite() || frequency < 0.0 || self.real.is_empty() {
            return None;
        }
        let bin = (frequency * self.real.len() as f32 / self.sample_rate).round() as usize;
        (bin < self.powers.len()).then_some(bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn sine_frame(len: usize, period: f32) -> Vec<f32> {
        (0..len).map(|n| (TAU * n as f32 / period).sin()).collect()
    }

    #[test]
    fn test_frequencies_follow_the_bin_grid() {
        let spectrum =
            LinearSpectrum::new(0, vec![0.0; 8], vec![0.0; 8], 8000.0).unwrap();
        assert_eq!(spectrum.frequencies(), &[0.0, 1000.0, 2000.0, 3000.0]);
        assert_eq!(spectrum.num_samples(), 8);
        assert_eq!(spectrum.powers().len(), 4);
    }

    #[test]
    fn test_rejects_mismatched_parts() {
        assert!(LinearSpectrum::new(0, vec![0.0; 8], vec![0.0; 7], 8000.0).is_err());
    }

    #[test]
    fn test_from_samples_peaks_at_the_signal_frequency() {
        // 8 cycles in 64 samples at 64 kHz -> 8 kHz
        let samples = sine_frame(64, 8.0);
        let spectrum = LinearSpectrum::from_samples(0, &samples, 64000.0).unwrap();
        let peak = onda_math::vector::max_index(spectrum.magnitudes()).unwrap();
        assert_eq!(peak, 8);
        assert_eq!(spectrum.frequencies()[peak], 8000.0);
        // magnitude of a unit sine over N samples is N/2
        assert!((spectrum.magnitudes()[peak] - 32.0).abs() < 1e-3);
    }

    #[test]
    fn test_from_samples_pads_to_a_power_of_two() {
        let samples = vec![1.0; 48];
        let spectrum = LinearSpectrum::from_samples(0, &samples, 48000.0).unwrap();
        assert_eq!(spectrum.num_samples(), 64);
        assert!(LinearSpectrum::from_samples(0, &[], 48000.0).is_err());
    }

    #[test]
    fn test_bin_lookup() {
        let spectrum =
            LinearSpectrum::new(0, vec![0.0; 8], vec![0.0; 8], 8000.0).unwrap();
        assert_eq!(spectrum.bin(0.0), Some(0));
        assert_eq!(spectrum.bin(1100.0), Some(1));
        assert_eq!(spectrum.bin(2900.0), Some(3));
        // at and beyond Nyquist there is no positive-half bin
        assert_eq!(spectrum.bin(4000.0), None);
        assert_eq!(spectrum.bin(-1.0), None);
    }

    #[test]
    fn test_derive_keeps_frame_number_and_sample_rate() {
        let spectrum =
            LinearSpectrum::new(5, vec![0.0; 4], vec![0.0; 4], 4000.0).unwrap();
        assert_eq!(spectrum.frame_number(), 5);
        let derived = spectrum.derive(vec![1.0, 0.0, 1.0, 0.0], vec![0.0; 4]).unwrap();
        assert_eq!(derived.frame_number(), 5);
        assert_eq!(derived.sample_rate(), 4000.0);
        assert_eq!(derived.powers(), &[1.0, 0.0]);
    }
}
