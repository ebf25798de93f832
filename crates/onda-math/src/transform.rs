//! The forward/inverse transform contract shared by all spectral transforms.

use crate::{Error, Result};

/// Outcome of a forward or inverse transform: one real and one imaginary
/// vector of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    real: Vec<f32>,
    imaginary: Vec<f32>,
}

impl TransformResult {
    /// Bundles a real/imaginary pair, rejecting unequal lengths.
    pub fn new(real: Vec<f32>, imaginary: Vec<f32>) -> Result<Self> {
        if real.len() != imaginary.len() {
            return Err(Error::LengthMismatch {
                left: real.len(),
                right: imaginary.len(),
            });
        }
        Ok(Self { real, imaginary })
    }

    /// Constructor for internally produced pairs whose lengths match by
    /// construction.
    pub(crate) fn new_unchecked(real: Vec<f32>, imaginary: Vec<f32>) -> Self {
        debug_assert_eq!(real.len(), imaginary.len());
        Self { real, imaginary }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// `true` when the result holds no bins.
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Real part.
    pub fn real(&self) -> &[f32] {
        &self.real
    }

    /// Imaginary part.
    pub fn imaginary(&self) -> &[f32] {
        &self.imaginary
    }

    /// Per-bin power `re² + im²`.
    pub fn powers(&self) -> Vec<f32> {
        self.real
            .iter()
            .zip(&self.imaginary)
            .map(|(&re, &im)| re * re + im * im)
            .collect()
    }

    /// Per-bin magnitude `sqrt(re² + im²)`.
    pub fn magnitudes(&self) -> Vec<f32> {
        self.real
            .iter()
            .zip(&self.imaginary)
            .map(|(&re, &im)| (re * re + im * im).sqrt())
            .collect()
    }

    /// Consumes the result, returning `(real, imaginary)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>) {
        (self.real, self.imaginary)
    }
}

/// A spectral transform over fixed-size frames.
///
/// Instances are created for one frame size and are safe for concurrent use
/// once constructed; creation goes through a
/// [`TransformFactory`](crate::factory::TransformFactory).
pub trait Transform: Send + Sync {
    /// Number of samples per frame this instance operates on.
    fn num_samples(&self) -> usize;

    /// Forward transform of a real-valued frame.
    fn forward(&self, real: &[f32]) -> Result<TransformResult>;

    /// Forward transform of a complex frame given as separate real and
    /// imaginary parts.
    fn forward_complex(&self, real: &[f32], imaginary: &[f32]) -> Result<TransformResult>;

    /// Inverse transform.
    ///
    /// Implementations that only support the forward direction fail with
    /// [`Error::UnsupportedInverse`].
    fn inverse(&self, real: &[f32], imaginary: &[f32]) -> Result<TransformResult>;
}
