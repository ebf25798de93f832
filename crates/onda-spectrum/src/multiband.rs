//! Aggregation of spectra into a small number of frequency bands.

use std::sync::Arc;

use crate::spectrum::Spectrum;
use crate::{Error, Result};

/// Logarithmically spaced band boundaries from `min_frequency` to
/// `max_frequency`.
///
/// Returns `num_bands + 1` boundaries where every band spans the same
/// frequency ratio, the spacing of octave- and third-octave analyzers.
/// `logarithmic_bands(100.0, 800.0, 3)` doubles per band: 100, 200, 400,
/// 800 Hz.
///
/// # Errors
///
/// Fails when `num_bands` is zero or the frequencies are not a positive,
/// ascending, finite pair.
pub fn logarithmic_bands(
    min_frequency: f32,
    max_frequency: f32,
    num_bands: usize,
) -> Result<Vec<f32>> {
    if num_bands == 0 {
        return Err(Error::InvalidBandBoundaries {
            reason: "at least one band is required",
        });
    }
    if min_frequency <= 0.0 || !min_frequency.is_finite() {
        return Err(Error::InvalidBandBoundaries {
            reason: "min frequency must be positive and finite",
        });
    }
    if max_frequency <= min_frequency || !max_frequency.is_finite() {
        return Err(Error::InvalidBandBoundaries {
            reason: "max frequency must be finite and exceed min frequency",
        });
    }
    let ratio = f64::from(max_frequency) / f64::from(min_frequency);
    let bands = num_bands as f64;
    // the end points are taken verbatim so rounding cannot shift them
    Ok((0..=num_bands)
        .map(|i| {
            if i == 0 {
                min_frequency
            } else if i == num_bands {
                max_frequency
            } else {
                (f64::from(min_frequency) * ratio.powf(i as f64 / bands)) as f32
            }
        })
        .collect())
}

/// A spectrum reduced to a small number of frequency bands.
///
/// Band `i` covers `[boundaries[i], boundaries[i + 1])`. Band powers are
/// sums of source bin powers, band magnitudes their square roots, and the
/// frequency reported for a band is its center. The boundaries are shared
/// behind an [`Arc`] so derived spectra stay cheap.
#[derive(Debug, Clone)]
pub struct MultiBandSpectrum {
    frame_number: u64,
    real: Vec<f32>,
    imaginary: Vec<f32>,
    powers: Vec<f32>,
    magnitudes: Vec<f32>,
    centers: Vec<f32>,
    boundaries: Arc<[f32]>,
}

impl MultiBandSpectrum {
    /// Aggregates `spectrum` into the bands delimited by `boundaries`,
    /// keeping its frame number.
    ///
    /// Source bins below the first or at and above the last boundary are
    /// dropped. Bins are visited in ascending frequency order, which every
    /// [`Spectrum`] in this crate guarantees.
    ///
    /// # Errors
    ///
    /// Fails when the boundaries are not at least two strictly ascending
    /// values.
    pub fn from_spectrum<S>(spectrum: &S, boundaries: impl Into<Arc<[f32]>>) -> Result<Self>
    where
        S: Spectrum + ?Sized,
    {
        let boundaries = boundaries.into();
        check_boundaries(&boundaries)?;
        let num_bands = boundaries.len() - 1;
        let mut powers = vec![0.0f32; num_bands];
        let mut band = 0;
        for (&frequency, &power) in spectrum.frequencies().iter().zip(spectrum.powers()) {
            if frequency < boundaries[0] {
                continue;
            }
            while band < num_bands && frequency >= boundaries[band + 1] {
                band += 1;
            }
            if band == num_bands {
                break;
            }
            powers[band] += power;
        }
        let magnitudes: Vec<f32> = powers.iter().map(|&power| power.sqrt()).collect();
        Ok(Self {
            frame_number: spectrum.frame_number(),
            real: magnitudes.clone(),
            imaginary: vec![0.0; num_bands],
            centers: centers(&boundaries),
            powers,
            magnitudes,
            boundaries,
        })
    }

    /// Builds a banded spectrum directly from per-band transform data.
    ///
    /// # Errors
    ///
    /// Fails when the boundaries are invalid or the data length does not
    /// match the band count.
    pub fn from_parts(
        frame_number: u64,
        real: Vec<f32>,
        imaginary: Vec<f32>,
        boundaries: impl Into<Arc<[f32]>>,
    ) -> Result<Self> {
        let boundaries = boundaries.into();
        check_boundaries(&boundaries)?;
        if real.len() != imaginary.len() {
            return Err(onda_math::Error::LengthMismatch {
                left: real.len(),
                right: imaginary.len(),
            }
            .into());
        }
        if real.len() != boundaries.len() - 1 {
            return Err(Error::InvalidBandBoundaries {
                reason: "band data does not match the boundary count",
            });
        }
        let powers: Vec<f32> = real
            .iter()
            .zip(&imaginary)
            .map(|(&re, &im)| re * re + im * im)
            .collect();
        let magnitudes = powers.iter().map(|&power| power.sqrt()).collect();
        Ok(Self {
            frame_number,
            centers: centers(&boundaries),
            powers,
            magnitudes,
            real,
            imaginary,
            boundaries,
        })
    }

    /// A banded spectrum over the same frame number and boundaries with new
    /// band data.
    ///
    /// # Errors
    ///
    /// Fails when the data length does not match the band count.
    pub fn derive(&self, real: Vec<f32>, imaginary: Vec<f32>) -> Result<Self> {
        Self::from_parts(self.frame_number, real, imaginary, Arc::clone(&self.boundaries))
    }

    /// Number of bands.
    pub fn num_bands(&self) -> usize {
        self.powers.len()
    }

    /// The `num_bands + 1` boundaries delimiting the bands.
    pub fn boundaries(&self) -> &[f32] {
        &self.boundaries
    }

    /// The band whose `[low, high)` range covers `frequency`.
    pub fn band_index(&self, frequency: f32) -> Option<usize> {
        let last = self.boundaries[self.boundaries.len() - 1];
        if frequency.is_nan() || frequency < self.boundaries[0] || frequency >= last {
            return None;
        }
        Some(self.boundaries.partition_point(|&bound| bound <= frequency) - 1)
    }
}

impl Spectrum for MultiBandSpectrum {
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
        &self.centers
    }

    fn bin(&self, frequency: f32) -> Option<usize> {
        self.band_index(frequency)
    }
}

fn centers(boundaries: &[f32]) -> Vec<f32> {
    boundaries
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

fn check_boundaries(boundaries: &[f32]) -> Result<()> {
    if boundaries.len() < 2 {
        return Err(Error::InvalidBandBoundaries {
            reason: "at least two boundaries are required",
        });
    }
    if boundaries.iter().any(|bound| bound.is_nan())
        || boundaries.windows(2).any(|pair| pair[1] <= pair[0])
    {
        return Err(Error::InvalidBandBoundaries {
            reason: "boundaries must be strictly ascending",
        });
    }
    Ok(())
}
