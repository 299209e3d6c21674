//! Partition-scoped statistics kernels used by the feature builder and
//! the scorer. All functions are total over their inputs.

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fractional percentile ranks in (0, 1] with average-rank tie handling.
///
/// Each output is the average 1-based ordinal rank of the value among its
/// ties, divided by the partition size. Matches the ranking convention the
/// downstream score composition was calibrated against.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut lo = 0;
    while lo < n {
        let mut hi = lo;
        while hi + 1 < n && values[order[hi + 1]] == values[order[lo]] {
            hi += 1;
        }
        // positions lo+1 ..= hi+1, averaged over the tie run
        let avg_rank = (lo + hi) as f64 / 2.0 + 1.0;
        let pct = avg_rank / n as f64;
        for &idx in &order[lo..=hi] {
            ranks[idx] = pct;
        }
        lo = hi + 1;
    }
    ranks
}

/// Dense integer ranks, descending: the largest value gets 1, ties share a
/// rank, and the next distinct value takes the next integer with no gap.
pub fn dense_ranks_desc(values: &[f64]) -> Vec<u32> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut ranks = vec![0u32; n];
    let mut current = 0u32;
    let mut prev: Option<f64> = None;
    for &idx in &order {
        if prev != Some(values[idx]) {
            current += 1;
            prev = Some(values[idx]);
        }
        ranks[idx] = current;
    }
    ranks
}

/// Quantile by linear interpolation between order statistics.
/// Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}
