//! Order-independent floating-point helpers.
//!
//! Floating-point addition is commutative but not associative, so summing the
//! same terms in a different order can change the last bits of the result.
//! Every aggregation in the crate sorts its terms first, which makes the
//! result a function of the multiset of terms alone.

/// Sums `terms` after sorting them by [`f64::total_cmp`].
pub(crate) fn stable_sum(terms: &mut [f64]) -> f64 {
    terms.sort_by(|a, b| a.total_cmp(b));
    terms.iter().sum()
}

/// Weighted mean of `(value, weight)` pairs, independent of pair order.
///
/// Returns `None` when the pairs are empty or every weight is zero.
pub(crate) fn stable_weighted_mean(pairs: &mut [(f64, f64)]) -> Option<f64> {
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut products: Vec<f64> = pairs.iter().map(|(v, w)| v * w).collect();
    let mut weights: Vec<f64> = pairs.iter().map(|(_, w)| *w).collect();

    let total_weight = stable_sum(&mut weights);
    if pairs.is_empty() || total_weight <= 0.0 {
        return None;
    }
    Some(stable_sum(&mut products) / total_weight)
}

/// Whether `used` fits into `limit`, tolerating accumulated rounding error.
pub(crate) fn fits(used: f64, limit: f64) -> bool {
    used <= limit + FEASIBILITY_TOLERANCE
}

pub(crate) const FEASIBILITY_TOLERANCE: f64 = 1e-9;
