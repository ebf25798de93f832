//! Autocorrelation of sample frames.
//!
//! [`autocorr_fft`] goes through the frequency domain: zero-pad to a power
//! of two, forward FFT, per-bin power (optionally compressed), inverse FFT,
//! and the real part restricted to the requested delays. Because the frame
//! is padded only to the next power of two, the result is a circular
//! autocorrelation: it matches the time-domain sum of [`autocorr_direct`]
//! only while `delay + support <= padded_len`, where `support` is the index
//! past the last non-zero sample. Frames whose tail is silent, the common
//! case for onset- and pitch-style analysis, satisfy this for every delay
//! of interest.

use crate::factory::{self, TransformFactory};
use crate::vector;
use crate::{Error, Result};

/// Autocorrelation over delays `0..=len / 2` with uncompressed powers.
///
/// # Errors
///
/// Returns [`Error::InvalidDelayRange`] when `samples` is empty.
pub fn autocorr(samples: &[f32]) -> Result<Vec<f32>> {
    autocorr_fft(samples, 0, samples.len() / 2, 2.0)
}

/// Autocorrelation over `min_delay..=max_delay` with uncompressed powers.
///
/// # Errors
///
/// Returns [`Error::InvalidDelayRange`] when the delay range is empty or
/// reaches past the frame.
pub fn autocorr_range(samples: &[f32], min_delay: usize, max_delay: usize) -> Result<Vec<f32>> {
    autocorr_fft(samples, min_delay, max_delay, 2.0)
}

/// Frequency-domain autocorrelation with magnitude compression.
///
/// The per-bin exponent applies to magnitudes: each power spectrum value is
/// replaced by `magnitude^magnitude_compression` before the inverse
/// transform. `2.0` is the plain autocorrelation; smaller exponents whiten
/// the spectrum and sharpen periodicity peaks.
///
/// # Errors
///
/// Returns [`Error::InvalidDelayRange`] when the delay range is empty or
/// reaches past the frame.
pub fn autocorr_fft(
    samples: &[f32],
    min_delay: usize,
    max_delay: usize,
    magnitude_compression: f32,
) -> Result<Vec<f32>> {
    check_delays(samples, min_delay, max_delay)?;
    let padded = vector::zero_pad(samples, 0);
    let fft = factory::fft_transforms().create(padded.len())?;
    let spectrum = fft.forward(&padded)?;
    let mut powers = spectrum.powers();
    if magnitude_compression != 2.0 {
        for power in &mut powers {
            *power = f64::from(*power)
                .sqrt()
                .powf(f64::from(magnitude_compression)) as f32;
        }
    }
    let zeros = vec![0.0; powers.len()];
    let result = fft.inverse(&powers, &zeros)?;
    Ok(result.real()[min_delay..=max_delay].to_vec())
}

/// Time-domain autocorrelation, the literal sum `Σ x[n]·x[n + delay]`.
///
/// Quadratic in the frame length; intended for small frames and as a
/// reference for the frequency-domain path.
///
/// # Errors
///
/// Returns [`Error::InvalidDelayRange`] when the delay range is empty or
/// reaches past the frame.
pub fn autocorr_direct(samples: &[f32], min_delay: usize, max_delay: usize) -> Result<Vec<f32>> {
    check_delays(samples, min_delay, max_delay)?;
    let mut result = Vec::with_capacity(max_delay - min_delay + 1);
    for delay in min_delay..=max_delay {
        let mut sum = 0.0f32;
        for n in 0..samples.len() - delay {
            sum += samples[n] * samples[n + delay];
        }
        result.push(sum);
    }
    Ok(result)
}

fn check_delays(samples: &[f32], min_delay: usize, max_delay: usize) -> Result<()> {
    if max_delay >= samples.len() || min_delay > max_delay {
        return Err(Error::InvalidDelayRange {
            min_delay,
            max_delay,
            len: samples.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn assert_close(actual: &[f32], expected: &[f32], tolerance: f32) {
        assert_eq!(actual.len(), expected.len());
        for (delay, (&a, &e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() < tolerance,
                "delay {delay}: {a} vs {e}"
            );
        }
    }

    /// Power-of-two frame with a silent tail, so the circular and linear
    /// autocorrelations agree over the tested delays.
    #[test]
    fn test_fft_path_matches_direct_sum_for_burst() {
        let mut samples = vec![0.0; 256];
        for (n, sample) in samples.iter_mut().take(128).enumerate() {
            *sample = (TAU * n as f32 / 16.0).sin();
        }
        let direct = autocorr_direct(&samples, 0, 127).unwrap();
        let fft = autocorr_fft(&samples, 0, 127, 2.0).unwrap();
        assert_close(&fft, &direct, 1e-2);
    }

    #[test]
    fn test_fft_path_matches_direct_sum_after_padding() {
        let mut samples = vec![0.0; 200];
        for (n, sample) in samples.iter_mut().take(100).enumerate() {
            *sample = (TAU * n as f32 / 20.0).sin() * (1.0 - n as f32 / 100.0);
        }
        let direct = autocorr_direct(&samples, 0, 99).unwrap();
        let fft = autocorr_fft(&samples, 0, 99, 2.0).unwrap();
        assert_close(&fft, &direct, 1e-2);
    }

    #[test]
    fn test_zero_delay_equals_energy() {
        let samples: Vec<f32> = (0..32).map(|n| (n as f32 * 0.37).sin() * 2.0).collect();
        let energy = vector::dot(&samples, &samples) as f32;
        let result = autocorr_fft(&samples, 0, 0, 2.0).unwrap();
        assert!((result[0] - energy).abs() < 1e-2);
    }

    #[test]
    fn test_periodic_signal_peaks_at_its_period() {
        let samples: Vec<f32> = (0..256).map(|n| (TAU * n as f32 / 32.0).sin()).collect();
        let result = autocorr(&samples).unwrap();
        assert!(result[32] > result[16]);
        assert!((result[32] - result[0]).abs() < 1e-2);
    }

    #[test]
    fn test_magnitude_compression_changes_the_result() {
        let samples: Vec<f32> = (0..32).map(|n| (TAU * n as f32 / 8.0).sin()).collect();
        let plain = autocorr_fft(&samples, 0, 16, 2.0).unwrap();
        let whitened = autocorr_fft(&samples, 0, 16, 1.0).unwrap();
        assert!((plain[0] - whitened[0]).abs() > 1.0);
    }

    #[test]
    fn test_rejects_bad_delay_ranges() {
        assert!(matches!(
            autocorr_direct(&[1.0, 2.0], 0, 2),
            Err(Error::InvalidDelayRange { max_delay: 2, len: 2, .. })
        ));
        assert!(matches!(
            autocorr_range(&[1.0, 2.0, 3.0], 2, 1),
            Err(Error::InvalidDelayRange { min_delay: 2, max_delay: 1, .. })
        ));
        assert!(autocorr(&[]).is_err());
    }
}
