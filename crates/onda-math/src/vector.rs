//! Elementwise operations, statistics, norms, and distances over sample vectors.
//!
//! Everything in this module is a pure function over `f32` slices. Two-vector
//! metrics (distances, cosine similarity, correlation) require equal lengths
//! and fail with [`Error::LengthMismatch`] otherwise; [`add`] and [`subtract`]
//! instead treat the shorter operand as zero-padded. Norms, distances, and dot
//! products accumulate in `f64` and return `f64`; frame statistics return
//! `f32`.
//!
//! Operations over a sub-range of a vector take a plain subslice
//! (`&data[offset..offset + len]`) rather than separate offset/length
//! arguments.
//!
//! Destructive operations are the `*_in_place` functions taking `&mut [f32]`;
//! every one of them has a copying counterpart that borrows immutably and
//! returns a fresh vector.

use std::borrow::Cow;

use crate::{Error, Result};

/// Base-2 logarithm.
#[inline]
pub fn log2(n: f32) -> f32 {
    n.log2()
}

/// Adds two vectors, treating the shorter operand as zero-padded at the end.
pub fn add(a: &[f32], b: &[f32]) -> Vec<f32> {
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut sum = longer.to_vec();
    for (s, &v) in sum.iter_mut().zip(shorter) {
        *s += v;
    }
    sum
}

/// Subtracts `b` from `a`, treating the shorter operand as zero-padded at the
/// end.
///
/// Where `b` extends past `a`, the result is the negated tail of `b`, since
/// `a - b` over the padding region equals `-b`.
pub fn subtract(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut diff = vec![0.0; a.len().max(b.len())];
    for (i, d) in diff.iter_mut().enumerate() {
        let x = a.get(i).copied().unwrap_or(0.0);
        let y = b.get(i).copied().unwrap_or(0.0);
        *d = x - y;
    }
    diff
}

/// Returns a copy with every element replaced by its absolute value.
pub fn abs(data: &[f32]) -> Vec<f32> {
    data.iter().map(|v| v.abs()).collect()
}

/// Replaces every element with its absolute value.
pub fn abs_in_place(data: &mut [f32]) {
    for v in data.iter_mut() {
        *v = v.abs();
    }
}

/// Returns a copy with every element squared.
pub fn squared(data: &[f32]) -> Vec<f32> {
    data.iter().map(|v| v * v).collect()
}

/// Squares every element in place.
pub fn square_in_place(data: &mut [f32]) {
    for v in data.iter_mut() {
        *v *= *v;
    }
}

/// Returns a copy with every element multiplied by `factor`.
pub fn scaled(data: &[f32], factor: f32) -> Vec<f32> {
    data.iter().map(|v| v * factor).collect()
}

/// Multiplies every element by `factor` in place.
pub fn scale_in_place(data: &mut [f32], factor: f32) {
    for v in data.iter_mut() {
        *v *= factor;
    }
}

/// Returns a reversed copy.
///
/// For the in-place form use `<[f32]>::reverse` from the standard library.
pub fn reversed(data: &[f32]) -> Vec<f32> {
    let mut out = data.to_vec();
    out.reverse();
    out
}

/// Zero-pads `data` at the end to a power-of-two length of at least `min_len`.
///
/// Returns the input unchanged (no copy) when its length is already a power of
/// two and reaches `min_len`. Otherwise the target is the shortest power of
/// two (minimum 2) that both exceeds the current length and reaches `min_len`.
pub fn zero_pad(data: &[f32], min_len: usize) -> Cow<'_, [f32]> {
    let len = data.len();
    if (len.is_power_of_two() || len == 0) && len >= min_len {
        return Cow::Borrowed(data);
    }
    let mut padded_len = 2;
    while padded_len <= len || padded_len < min_len {
        padded_len <<= 1;
    }
    let mut padded = vec![0.0; padded_len];
    padded[..len].copy_from_slice(data);
    Cow::Owned(padded)
}

/// Arithmetic mean, accumulated in `f64`.
///
/// The mean of an empty slice is NaN.
pub fn mean(data: &[f32]) -> f32 {
    (data.iter().map(|&v| f64::from(v)).sum::<f64>() / data.len() as f64) as f32
}

/// Population variance, computed against the arithmetic mean of the same data.
pub fn variance(data: &[f32]) -> f32 {
    let mean = f64::from(mean(data));
    let len = data.len() as f64;
    let sum: f64 = data
        .iter()
        .map(|&v| {
            let diff = f64::from(v) - mean;
            diff * diff / len
        })
        .sum();
    sum as f32
}

/// Population standard deviation.
pub fn std_dev(data: &[f32]) -> f32 {
    variance(data).sqrt()
}

/// Mean absolute deviation around an arbitrary center point.
pub fn mean_absolute_deviation(center: f32, data: &[f32]) -> f32 {
    let sum: f64 = data.iter().map(|&v| f64::from((v - center).abs())).sum();
    (sum / data.len() as f64) as f32
}

/// Median of the values.
///
/// The data is copied and sorted ascending; for even lengths the two middle
/// elements are averaged.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn median(data: &[f32]) -> f32 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Smallest value in the slice, or positive infinity when it is empty.
pub fn min(data: &[f32]) -> f32 {
    data.iter()
        .fold(f32::INFINITY, |m, &v| if v < m { v } else { m })
}

/// Largest value in the slice, or negative infinity when it is empty.
pub fn max(data: &[f32]) -> f32 {
    data.iter()
        .fold(f32::NEG_INFINITY, |m, &v| if v > m { v } else { m })
}

/// Index of the largest value, or `None` for an empty slice.
///
/// The first occurrence wins on ties. NaN never wins a comparison, so an
/// all-NaN slice also yields `None`.
pub fn max_index(data: &[f32]) -> Option<usize> {
    let mut best = None;
    let mut max = f32::NEG_INFINITY;
    for (i, &v) in data.iter().enumerate() {
        if v > max {
            max = v;
            best = Some(i);
        }
    }
    best
}

/// All indices of the slice, ordered by their value, largest first.
///
/// The sort is stable, so equal values keep their original index order.
pub fn max_indices(data: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..data.len()).collect();
    indices.sort_by(|&a, &b| data[b].total_cmp(&data[a]));
    indices
}

/// Dot product over the overlapping prefix of the two vectors, accumulated in
/// `f64`.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Euclidean (2-)norm.
pub fn euclidean_norm(data: &[f32]) -> f64 {
    data.iter()
        .map(|&v| {
            let v = f64::from(v);
            v * v
        })
        .sum::<f64>()
        .sqrt()
}

/// City-block (1-)norm: the sum of absolute values.
pub fn city_block_norm(data: &[f32]) -> f64 {
    data.iter().map(|&v| f64::from(v.abs())).sum()
}

/// General p-norm `sum(|x|^p)^(1/p)`.
///
/// `p == 1` and `p == 2` fall through to the dedicated norms.
pub fn p_norm(data: &[f32], p: f64) -> f64 {
    if p == 2.0 {
        return euclidean_norm(data);
    }
    if p == 1.0 {
        return city_block_norm(data);
    }
    data.iter()
        .map(|&v| f64::from(v.abs()).powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

/// Euclidean distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_same_length(a, b)?;
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = f64::from(x - y);
            diff * diff
        })
        .sum();
    Ok(sum.sqrt())
}

/// Euclidean distance counting only components where `a` meets or exceeds `b`.
///
/// Asymmetric: swapping the arguments changes the result. Used to measure how
/// much `a` has grown over `b` while ignoring decay.
pub fn euclidean_increase_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_same_length(a, b)?;
    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let diff = x - y;
        if diff >= 0.0 {
            sum += f64::from(diff) * f64::from(diff);
        }
    }
    Ok(sum.sqrt())
}

/// City-block (Manhattan) distance between two equal-length vectors.
pub fn city_block_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_same_length(a, b)?;
    Ok(a.iter().zip(b).map(|(&x, &y)| f64::from((x - y).abs())).sum())
}

/// City-block distance counting only components where `a` meets or exceeds
/// `b`.
///
/// Asymmetric, like [`euclidean_increase_distance`].
pub fn city_block_increase_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_same_length(a, b)?;
    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let diff = x - y;
        if diff >= 0.0 {
            sum += f64::from(diff);
        }
    }
    Ok(sum)
}

/// General p-distance: the p-norm of the elementwise difference.
pub fn p_distance(a: &[f32], b: &[f32], p: f64) -> Result<f64> {
    check_same_length(a, b)?;
    if p == 2.0 {
        return euclidean_distance(a, b);
    }
    if p == 1.0 {
        return city_block_distance(a, b);
    }
    Ok(p_norm(&subtract(a, b), p))
}

/// General p-distance counting only components where `a` meets or exceeds
/// `b`.
///
/// Asymmetric, like [`euclidean_increase_distance`]. `p == 1` and `p == 2`
/// fall through to the dedicated increase-only distances.
pub fn p_increase_distance(a: &[f32], b: &[f32], p: f64) -> Result<f64> {
    check_same_length(a, b)?;
    if p == 2.0 {
        return euclidean_increase_distance(a, b);
    }
    if p == 1.0 {
        return city_block_increase_distance(a, b);
    }
    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let diff = x - y;
        if diff >= 0.0 {
            sum += f64::from(diff).powf(p);
        }
    }
    Ok(sum.powf(1.0 / p))
}

/// Cosine similarity `dot(a,b) / (|a|·|b|)`.
///
/// Defined as 1 when `a` and `b` are the same slice (same pointer and length)
/// and as 0 when either norm is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    check_same_length(a, b)?;
    if same_slice(a, b) {
        return Ok(1.0);
    }
    cosine_similarity_with_norms(a, b, euclidean_norm(a), euclidean_norm(b))
}

/// Cosine similarity with externally precomputed Euclidean norms.
///
/// Lets callers that cache norms across many comparisons (see
/// [`CachingCosineDistance`](crate::distance::CachingCosineDistance)) skip the
/// recomputation.
pub fn cosine_similarity_with_norms(
    a: &[f32],
    b: &[f32],
    norm_a: f64,
    norm_b: f64,
) -> Result<f64> {
    check_same_length(a, b)?;
    let norm_product = norm_a * norm_b;
    if norm_product == 0.0 {
        return Ok(0.0);
    }
    Ok(dot(a, b) / norm_product)
}

/// Cosine distance `1 - cosine_similarity`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    Ok(1.0 - cosine_similarity(a, b)?)
}

/// Pearson correlation coefficient of two equal-length vectors.
///
/// NaN when either vector has zero variance.
pub fn correlation(a: &[f32], b: &[f32]) -> Result<f32> {
    check_same_length(a, b)?;
    let mean_a = f64::from(mean(a));
    let mean_b = f64::from(mean(b));
    let mut cov = 0.0f64;
    let mut square_diffs_a = 0.0f64;
    let mut square_diffs_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let a_diff = f64::from(x) - mean_a;
        let b_diff = f64::from(y) - mean_b;
        cov += a_diff * b_diff;
        square_diffs_a += a_diff * a_diff;
        square_diffs_b += b_diff * b_diff;
    }
    Ok((cov / (square_diffs_a * square_diffs_b).sqrt()) as f32)
}

/// Sum of all values, accumulated in `f64`.
pub fn sum(data: &[f32]) -> f32 {
    data.iter().map(|&v| f64::from(v)).sum::<f64>() as f32
}

/// Elementwise sum of several vectors of differing lengths.
///
/// The result is as long as the longest input; shorter inputs contribute
/// zeros past their end. Empty input yields an empty vector.
pub fn sum_arrays(arrays: &[&[f32]]) -> Vec<f32> {
    let longest = arrays.iter().map(|a| a.len()).max().unwrap_or(0);
    let mut out = vec![0.0; longest];
    for array in arrays {
        for (o, &v) in out.iter_mut().zip(*array) {
            *o += v;
        }
    }
    out
}

/// Root mean square of one frame of data.
pub fn rms(data: &[f32]) -> f32 {
    let mean_square = data
        .iter()
        .map(|&v| {
            let v = f64::from(v);
            v * v
        })
        .sum::<f64>()
        / data.len() as f64;
    mean_square.sqrt() as f32
}

/// Zero-crossing rate: adjacent pairs with a strictly negative product,
/// divided by `len - 1`.
///
/// Zero for inputs shorter than two samples.
pub fn zero_crossing_rate(data: &[f32]) -> f32 {
    if data.len() < 2 {
        return 0.0;
    }
    let crossings = data.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    crossings as f32 / (data.len() - 1) as f32
}

/// Fraction of samples strictly below the arithmetic mean.
pub fn percentage_below_mean(data: &[f32]) -> f32 {
    let mean = mean(data);
    let count = data.iter().filter(|&&v| v < mean).count();
    count as f32 / data.len() as f32
}

/// Folds a vector into `length` bins by summing all values whose indices are
/// congruent modulo `length`.
pub fn wrap(data: &[f32], length: usize) -> Vec<f32> {
    let mut out = vec![0.0; length];
    for (i, &v) in data.iter().enumerate() {
        out[i % length] += v;
    }
    out
}

/// `true` when two slices share the same backing storage.
#[inline]
pub(crate) fn same_slice(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.as_ptr() == b.as_ptr()
}

fn check_same_length(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        })
    }
}
