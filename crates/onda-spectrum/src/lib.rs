//! Spectral frame types and frequency-band aggregation.
//!
//! This crate provides:
//!
//! - [`spectrum`] - The [`Spectrum`] access trait and [`LinearSpectrum`], the FFT view of one frame
//! - [`multiband`] - [`MultiBandSpectrum`] and logarithmic band construction
//!
//! ## Example
//!
//! ```rust,ignore
//! use onda_spectrum::{LinearSpectrum, MultiBandSpectrum, logarithmic_bands};
//!
//! let spectrum = LinearSpectrum::from_samples(frame_number, &frame, 44100.0)?;
//! let bands = logarithmic_bands(110.0, 3520.0, 5)?;
//! let banded = MultiBandSpectrum::from_spectrum(&spectrum, bands)?;
//! ```

pub mod multiband;
pub mod spectrum;

// Re-export main types
pub use multiband::{MultiBandSpectrum, logarithmic_bands};
pub use spectrum::{LinearSpectrum, Spectrum};

/// Error types for spectrum construction and banding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Band boundaries that do not describe at least one ascending band.
    #[error("Invalid band boundaries: {reason}")]
    InvalidBandBoundaries {
        /// What is wrong with the boundaries.
        reason: &'static str,
    },

    /// An underlying vector math or transform error.
    #[error("Math error: {0}")]
    Math(#[from] onda_math::Error),
}

/// Convenience result type for spectrum operations.
pub type Result<T> = std::result::Result<T, Error>;
