//! Local-maximum detection over sample vectors.
//!
//! [`peaks`] makes a single left-to-right scan tracking the lengths of the
//! current increasing, decreasing, and equal-value runs. An index becomes a
//! peak candidate once it tops an increasing run of at least `interval`
//! samples, and the candidate is accepted once the following decreasing run
//! (or, in non-strict mode, a plateau) also reaches `interval` samples.

/// Finds indices of local maxima with at least `interval` monotonic samples
/// on each shoulder.
///
/// In strict mode a plateau breaks both shoulders. Otherwise plateau samples
/// are folded into whichever run they adjoin, and a plateau of `interval`
/// samples directly after a candidate accepts it. Index 0 can never be a
/// peak.
pub fn peaks(data: &[f32], interval: usize, strict: bool) -> Vec<usize> {
    let mut found = Vec::new();
    let mut increasing = 0usize;
    let mut decreasing = 0usize;
    let mut same = 0usize;
    let mut candidate: Option<usize> = None;
    for i in 1..data.len() {
        if data[i - 1] < data[i] {
            increasing += 1 + same;
            same = 0;
            decreasing = 0;
            candidate = None;
        } else if data[i - 1] == data[i] {
            if strict {
                increasing = 0;
                decreasing = 0;
                candidate = None;
            } else {
                same += 1;
                if same == interval {
                    if let Some(peak) = candidate.take() {
                        found.push(peak);
                    }
                }
            }
        } else {
            // Plateau samples extend the increasing run unless we were
            // already descending, in which case they extend the descent.
            if decreasing == 0 {
                increasing += same;
                same = 0;
            }
            if increasing >= interval {
                candidate = (i > 1).then_some(i - 1);
            }
            decreasing += same + 1;
            same = 0;
            increasing = 0;
            if decreasing >= interval {
                if let Some(peak) = candidate.take() {
                    found.push(peak);
                }
            }
        }
    }
    found
}
