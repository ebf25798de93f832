//! Distance functors for frame-to-frame comparison.
//!
//! A [`DistanceFunction`] compares the previous frame of a stream to the
//! current one. `distance(last, now)` is oriented so that the increase-only
//! variants measure how much `now` has grown over `last` while ignoring
//! decay. The unit structs cover the fixed measures; [`WindowedCosineDistance`]
//! and [`WindowedCosineSimilarity`] restrict the comparison to a band of
//! bins, and the caching variants memoize frame norms for sliding-window
//! use.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use parking_lot::Mutex;

use crate::vector;
use crate::Result;

/// A named measure between two equal-length frames.
///
/// Implementations are sharable across threads so a single functor can serve
/// a whole analysis pipeline; [`fmt::Display`] supplies the measure's name
/// for logs and pipeline descriptions.
pub trait DistanceFunction: fmt::Display + Send + Sync {
    /// Measures the change from `last` to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`](crate::Error::LengthMismatch) when
    /// the frames differ in length.
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64>;

    /// Whether `distance(a, b) == distance(b, a)` for all frames.
    ///
    /// The increase-only measures are the asymmetric ones. Callers that
    /// assume symmetry, such as a self-similarity matrix filling only one
    /// triangle, should check this first.
    fn is_symmetric(&self) -> bool;
}

/// Euclidean distance between consecutive frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl DistanceFunction for EuclideanDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::euclidean_distance(now, last)
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for EuclideanDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("euclidean-distance")
    }
}

/// Euclidean distance over components that grew since the last frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanIncreaseDistance;

impl DistanceFunction for EuclideanIncreaseDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::euclidean_increase_distance(now, last)
    }

    fn is_symmetric(&self) -> bool {
        false
    }
}

impl fmt::Display for EuclideanIncreaseDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("euclidean-increase-distance")
    }
}

/// City-block distance between consecutive frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct CityBlockDistance;

impl DistanceFunction for CityBlockDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::city_block_distance(now, last)
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for CityBlockDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("city-block-distance")
    }
}

/// City-block distance over components that grew since the last frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct CityBlockIncreaseDistance;

impl DistanceFunction for CityBlockIncreaseDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::city_block_increase_distance(now, last)
    }

    fn is_symmetric(&self) -> bool {
        false
    }
}

impl fmt::Display for CityBlockIncreaseDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("city-block-increase-distance")
    }
}

/// Cosine distance `1 - cosine_similarity` between consecutive frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineDistance;

impl DistanceFunction for CosineDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::cosine_distance(now, last)
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for CosineDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cosine-distance")
    }
}

/// Cosine similarity between consecutive frames.
///
/// Not a metric, but it shares the functor shape so pipelines can swap it in
/// wherever a [`DistanceFunction`] is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl DistanceFunction for CosineSimilarity {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::cosine_similarity(now, last)
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for CosineSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cosine-similarity")
    }
}

/// Cosine distance over the bins `offset..offset + len` of each frame.
///
/// Comparing a band instead of the whole frame singles out a frequency
/// region of interest, e.g. the low bins of a magnitude spectrum.
///
/// # Panics
///
/// [`DistanceFunction::distance`] panics when either frame is shorter than
/// `offset + len`.
#[derive(Debug, Clone, Copy)]
pub struct WindowedCosineDistance {
    offset: usize,
    len: usize,
}

impl WindowedCosineDistance {
    /// A functor comparing `len` bins starting at `offset`.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    fn window(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

impl DistanceFunction for WindowedCosineDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::cosine_distance(&now[self.window()], &last[self.window()])
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for WindowedCosineDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cosine-distance[{}..{}]", self.offset, self.offset + self.len)
    }
}

/// Cosine similarity over the bins `offset..offset + len` of each frame.
///
/// # Panics
///
/// [`DistanceFunction::distance`] panics when either frame is shorter than
/// `offset + len`.
#[derive(Debug, Clone, Copy)]
pub struct WindowedCosineSimilarity {
    offset: usize,
    len: usize,
}

impl WindowedCosineSimilarity {
    /// A functor comparing `len` bins starting at `offset`.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    fn window(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

impl DistanceFunction for WindowedCosineSimilarity {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        vector::cosine_similarity(&now[self.window()], &last[self.window()])
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for WindowedCosineSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cosine-similarity[{}..{}]", self.offset, self.offset + self.len)
    }
}

/// Norm entries a cache holds before it is cleared wholesale.
const NORM_CACHE_CAPACITY: usize = 1024;

/// Euclidean norms memoized by slice identity (data pointer and length).
#[derive(Debug, Default)]
struct NormCache {
    norms: Mutex<HashMap<(usize, usize), f64>>,
}

impl NormCache {
    fn norm(&self, data: &[f32]) -> f64 {
        let key = (data.as_ptr() as usize, data.len());
        let mut norms = self.norms.lock();
        if let Some(&norm) = norms.get(&key) {
            return norm;
        }
        let norm = vector::euclidean_norm(data);
        if norms.len() == NORM_CACHE_CAPACITY {
            norms.clear();
        }
        norms.insert(key, norm);
        norm
    }

    fn clear(&self) {
        self.norms.lock().clear();
    }
}

/// [`CosineDistance`] with frame norms memoized across calls.
///
/// In a sliding comparison every frame is seen twice, once as `now` and once
/// as `last`; memoizing the norm halves the per-frame work. The cache is
/// keyed by slice identity, not content: it is only sound while compared
/// frames stay alive and unmoved, the usual situation when sliding over a
/// preallocated ring of frames. A reallocated buffer at a recycled address
/// would alias a stale entry; call [`clear`](Self::clear) or drop the
/// functor when the working set changes.
#[derive(Debug, Default)]
pub struct CachingCosineDistance {
    cache: NormCache,
}

impl CachingCosineDistance {
    /// A functor with an empty norm cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all memoized norms.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl DistanceFunction for CachingCosineDistance {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        if vector::same_slice(now, last) {
            return Ok(0.0);
        }
        let similarity = vector::cosine_similarity_with_norms(
            now,
            last,
            self.cache.norm(now),
            self.cache.norm(last),
        )?;
        Ok(1.0 - similarity)
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for CachingCosineDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cosine-distance")
    }
}

/// [`CosineSimilarity`] with frame norms memoized across calls.
///
/// Shares the identity-keyed caching contract of [`CachingCosineDistance`].
#[derive(Debug, Default)]
pub struct CachingCosineSimilarity {
    cache: NormCache,
}

impl CachingCosineSimilarity {
    /// A functor with an empty norm cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all memoized norms.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl DistanceFunction for CachingCosineSimilarity {
    fn distance(&self, last: &[f32], now: &[f32]) -> Result<f64> {
        if vector::same_slice(now, last) {
            return Ok(1.0);
        }
        vector::cosine_similarity_with_norms(
            now,
            last,
            self.cache.norm(now),
            self.cache.norm(last),
        )
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

impl fmt::Display for CachingCosineSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cosine-similarity")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_distance_measures_growth_of_now_over_last() {
        let last = [1.0, 5.0];
        let now = [3.0, 2.0];
        // first bin grew by 2, the decay of the second is ignored
        assert_eq!(CityBlockIncreaseDistance.distance(&last, &now).unwrap(), 2.0);
        assert_eq!(CityBlockIncreaseDistance.distance(&now, &last).unwrap(), 3.0);
        assert_eq!(EuclideanIncreaseDistance.distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
        assert_eq!(EuclideanIncreaseDistance.distance(&[3.0, 4.0], &[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric_functors_match_vector_ops() {
        let a = [1.0, 2.0, 2.0];
        let b = [3.0, 4.0, 5.0];
        assert_eq!(
            EuclideanDistance.distance(&a, &b).unwrap(),
            vector::euclidean_distance(&a, &b).unwrap()
        );
        assert_eq!(
            CityBlockDistance.distance(&a, &b).unwrap(),
            vector::city_block_distance(&a, &b).unwrap()
        );
    }

    #[test]
    fn test_cosine_functors() {
        let frame = [0.5, 0.25, 0.125];
        assert_eq!(CosineSimilarity.distance(&frame, &frame).unwrap(), 1.0);
        assert_eq!(CosineDistance.distance(&frame, &frame).unwrap(), 0.0);
        assert_eq!(CosineDistance.distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_windowed_functors_restrict_the_comparison() {
        // bins 1..3 agree, the rest do not
        let last = [9.0, 3.0, 4.0, 0.0];
        let now = [-2.0, 3.0, 4.0, 7.0];
        assert_eq!(WindowedCosineDistance::new(1, 2).distance(&last, &now).unwrap(), 0.0);
        assert_eq!(WindowedCosineSimilarity::new(1, 2).distance(&last, &now).unwrap(), 1.0);
        assert!(CosineDistance.distance(&last, &now).unwrap() > 0.0);
    }

    #[test]
    fn test_caching_matches_uncached() {
        let caching = CachingCosineDistance::new();
        let frames = [
            [0.3, -0.1, 0.8, 0.2],
            [0.6, 0.9, -0.4, 0.1],
            [0.0, 0.5, 0.5, -0.7],
        ];
        for last in &frames {
            for now in &frames {
                let expected = CosineDistance.distance(last, now).unwrap();
                // twice: the second call hits the norm cache
                assert_eq!(caching.distance(last, now).unwrap(), expected);
                assert_eq!(caching.distance(last, now).unwrap(), expected);
            }
        }
        caching.clear();
        assert_eq!(caching.distance(&frames[0], &frames[0]).unwrap(), 0.0);
    }

    #[test]
    fn test_caching_survives_cache_overflow() {
        let caching = CachingCosineSimilarity::new();
        let reference = [1.0, 0.0];
        let frames: Vec<[f32; 2]> = (0..1100).map(|i| [i as f32 + 1.0, 1.0]).collect();
        for frame in &frames {
            let expected = CosineSimilarity.distance(frame, &reference).unwrap();
            assert_eq!(caching.distance(frame, &reference).unwrap(), expected);
        }
    }

    #[test]
    fn test_only_increase_measures_are_asymmetric() {
        assert!(EuclideanDistance.is_symmetric());
        assert!(!EuclideanIncreaseDistance.is_symmetric());
        assert!(CityBlockDistance.is_symmetric());
        assert!(!CityBlockIncreaseDistance.is_symmetric());
        assert!(CosineDistance.is_symmetric());
        assert!(CosineSimilarity.is_symmetric());
        assert!(WindowedCosineDistance::new(0, 2).is_symmetric());
        assert!(WindowedCosineSimilarity::new(0, 2).is_symmetric());
        assert!(CachingCosineDistance::new().is_symmetric());
        assert!(CachingCosineSimilarity::new().is_symmetric());
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        assert!(EuclideanDistance.distance(&[1.0], &[1.0, 2.0]).is_err());
        assert!(CachingCosineDistance::new().distance(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_display_names() {
        let functors: Vec<(Box<dyn DistanceFunction>, &str)> = vec![
            (Box::new(EuclideanDistance), "euclidean-distance"),
            (Box::new(EuclideanIncreaseDistance), "euclidean-increase-distance"),
            (Box::new(CityBlockDistance), "city-block-distance"),
            (Box::new(CityBlockIncreaseDistance), "city-block-increase-distance"),
            (Box::new(CosineDistance), "cosine-distance"),
            (Box::new(CosineSimilarity), "cosine-similarity"),
            (Box::new(WindowedCosineDistance::new(1, 2)), "cosine-distance[1..3]"),
            (Box::new(CachingCosineDistance::new()), "cosine-distance"),
        ];
        for (functor, name) in &functors {
            assert_eq!(functor.to_string(), *name);
        }
    }
}
