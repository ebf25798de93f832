//! Naive discrete convolution in full, same, and valid modes.
//!
//! All three modes run the classic O(|f|·|g|) double loop; there is no FFT
//! acceleration for this general case. They differ only in which output
//! positions are kept:
//!
//! ```text
//! full:  length |f| + |g| - 1                 w[k] = sum_j f[j] * g[k - j]
//! same:  length |f|, g offset by |g|/2 so the result is centered on f
//! valid: length max(|f| - max(0, |g| - 1), 0), fully overlapping positions
//! ```
//!
//! Out-of-range `g` indices contribute zero.

/// Full convolution of `f` and `g`, length `|f| + |g| - 1`.
pub fn convolve(f: &[f32], g: &[f32]) -> Vec<f32> {
    let length = (f.len() + g.len()).saturating_sub(1);
    let mut w = vec![0.0; length];
    for (k, w_k) in w.iter_mut().enumerate() {
        *w_k = overlap_sum(f, g, k);
    }
    w
}

/// Convolution trimmed to the length of `f` and centered on it.
pub fn convolve_same(f: &[f32], g: &[f32]) -> Vec<f32> {
    let offset = g.len() / 2;
    let mut w = vec![0.0; f.len()];
    for (k, w_k) in w.iter_mut().enumerate() {
        *w_k = overlap_sum(f, g, k + offset);
    }
    w
}

/// Convolution restricted to fully overlapping positions, length
/// `max(|f| - max(0, |g| - 1), 0)`.
pub fn convolve_valid(f: &[f32], g: &[f32]) -> Vec<f32> {
    let length = f.len().saturating_sub(g.len().saturating_sub(1));
    let start = g.len().saturating_sub(1);
    let mut w = vec![0.0; length];
    for (k, w_k) in w.iter_mut().enumerate() {
        *w_k = overlap_sum(f, g, k + start);
    }
    w
}

/// `sum_j f[j] * g[k - j]` with out-of-range `g` indices treated as zero.
fn overlap_sum(f: &[f32], g: &[f32], k: usize) -> f32 {
    let mut sum = 0.0;
    for (j, &fj) in f.iter().enumerate() {
        if k >= j && k - j < g.len() {
            sum += fj * g[k - j];
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_against_hand_computed_result() {
        let w = convolve(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(w, vec![0.0, 1.0, 2.5, 4.0, 1.5]);
    }

    #[test]
    fn test_unit_impulse_is_identity() {
        let f = [1.0, -2.0, 3.0, 0.5];
        assert_eq!(convolve(&f, &[1.0]), f.to_vec());
        assert_eq!(convolve_same(&f, &[1.0]), f.to_vec());
        assert_eq!(convolve_valid(&f, &[1.0]), f.to_vec());
    }

    #[test]
    fn test_same_is_centered() {
        let w = convolve_same(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0, 1.0]);
        assert_eq!(w, vec![3.0, 6.0, 9.0, 7.0]);
    }

    #[test]
    fn test_valid_keeps_only_full_overlap() {
        let w = convolve_valid(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0, 1.0]);
        assert_eq!(w, vec![6.0, 9.0]);
    }

    #[test]
    fn test_output_lengths() {
        let f = vec![1.0; 7];
        let g = vec![1.0; 3];
        assert_eq!(convolve(&f, &g).len(), 9);
        assert_eq!(convolve_same(&f, &g).len(), 7);
        assert_eq!(convolve_valid(&f, &g).len(), 5);
        // kernel longer than the signal leaves no fully-overlapping position
        assert_eq!(convolve_valid(&g, &f).len(), 0);
        // degenerate operands
        assert_eq!(convolve(&[], &[]).len(), 0);
        assert_eq!(convolve(&f, &[]).len(), 6);
        assert_eq!(convolve_same(&f, &[]).len(), 7);
    }

    #[test]
    fn test_convolution_is_commutative() {
        let f = [1.0, 2.0, -1.0];
        let g = [0.5, 0.0, 0.25, 1.0];
        assert_eq!(convolve(&f, &g), convolve(&g, &f));
    }
}
