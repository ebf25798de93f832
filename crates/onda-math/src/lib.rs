//! Frame-based vector math and spectral transforms for signal analysis.
//!
//! This crate provides:
//!
//! - [`vector`] - Elementwise operations, statistics, norms, and distances over sample frames
//! - [`convolve`] - Full, same, and valid discrete convolution
//! - [`peaks`] - Local-maximum detection with a surrounding-slope requirement
//! - [`transform`] - The [`Transform`] contract and its [`TransformResult`]
//! - [`fft`] - Power-of-two FFT behind the [`Transform`] trait
//! - [`dct`] - DCT computed through a same-size FFT
//! - [`factory`] - Process-wide, size-cached providers of shared transform instances
//! - [`autocorr`] - Time- and frequency-domain autocorrelation
//! - [`distance`] - Named distance functors for frame-to-frame comparison
//!
//! ## Example
//!
//! ```rust,ignore
//! use onda_math::{autocorr, peaks, vector};
//!
//! // Periodicity analysis of one frame:
//! let correlation = autocorr::autocorr(&frame)?;
//! let candidates = peaks::peaks(&correlation, 3, false);
//! let strongest = vector::max_index(&correlation[1..]);
//! ```

pub mod autocorr;
pub mod convolve;
pub mod dct;
pub mod distance;
pub mod factory;
pub mod fft;
pub mod peaks;
pub mod transform;
pub mod vector;

// Re-export main types
pub use autocorr::{autocorr, autocorr_direct, autocorr_fft, autocorr_range};
pub use convolve::{convolve, convolve_same, convolve_valid};
pub use dct::Dct;
pub use distance::{
    CachingCosineDistance, CachingCosineSimilarity, CityBlockDistance, CityBlockIncreaseDistance,
    CosineDistance, CosineSimilarity, DistanceFunction, EuclideanDistance,
    EuclideanIncreaseDistance, WindowedCosineDistance, WindowedCosineSimilarity,
};
pub use factory::{
    CachingFactory, DctFactory, FftFactory, TransformFactory, dct_transforms, fft_transforms,
    install_dct_factory, install_fft_factory,
};
pub use fft::Fft;
pub use peaks::peaks;
pub use transform::{Transform, TransformResult};

/// Error types for math and transform operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two vectors that must match in length do not.
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first operand.
        left: usize,
        /// Length of the second operand.
        right: usize,
    },

    /// The requested transform size is not a positive power of two.
    #[error("Transform size must be a power of two, got {0}")]
    NotPowerOfTwo(usize),

    /// The autocorrelation delay range is empty or reaches past the frame.
    #[error("Delay range {min_delay}..={max_delay} invalid for {len} samples")]
    InvalidDelayRange {
        /// Smallest requested delay.
        min_delay: usize,
        /// Largest requested delay.
        max_delay: usize,
        /// Number of samples in the frame.
        len: usize,
    },

    /// The transform cannot run in the inverse direction.
    #[error("The {transform} transform has no inverse")]
    UnsupportedInverse {
        /// Name of the transform family.
        transform: &'static str,
    },
}

/// Convenience result type for math and transform operations.
pub type Result<T> = std::result::Result<T, Error>;
