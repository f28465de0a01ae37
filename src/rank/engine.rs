//! Sequential rule composition with a deterministic tie-breaker.

use super::types::RankRule;
use std::cmp::Ordering;

/// Strategy for breaking ties when every rule produces equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep the input order (stable sort).
    PreserveOrder,

    /// Order by an explicit per-item index, e.g. a catalog position.
    ByIndex,
}

/// Ranks items by an ordered list of rules.
///
/// Keys are bucketed on an `epsilon` grid; a later rule is consulted only
/// when every earlier rule's keys share a bucket. Remaining ties are settled by the [`TieBreaker`], so the
/// output is fully deterministic for identical inputs.
///
/// # Examples
///
/// ```
/// use u_wefe::rank::{RankEngine, RankRule, TieBreaker};
///
/// struct Ascending;
/// impl RankRule<f64, ()> for Ascending {
///     fn name(&self) -> &str { "Ascending" }
///     fn key(&self, item: &f64, _ctx: &()) -> f64 { *item }
/// }
///
/// let engine = RankEngine::new()
///     .with_rule(Ascending)
///     .with_tie_breaker(TieBreaker::ByIndex);
/// let order = engine.rank_indices(&[5.0, -1.0, 2.0], &[0, 1, 2], &());
/// assert_eq!(order, vec![1, 2, 0]);
/// ```
pub struct RankEngine<T, C> {
    rules: Vec<Box<dyn RankRule<T, C>>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl<T, C> RankEngine<T, C> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::PreserveOrder,
            epsilon: 1e-9,
        }
    }

    pub fn with_tie_breaker(mut self, tb: TieBreaker) -> Self {
        self.tie_breaker = tb;
        self
    }

    /// Sets the tolerance under which two keys count as equal.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    pub fn with_rule<R: RankRule<T, C> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Maps a key onto the `epsilon` grid.
    ///
    /// Keys in the same cell compare equal, which keeps equality transitive.
    fn quantize(&self, key: f64) -> f64 {
        if self.epsilon > 0.0 {
            (key / self.epsilon).round()
        } else {
            key
        }
    }

    fn compare_keys(ka: &[f64], kb: &[f64]) -> Ordering {
        ka.iter()
            .zip(kb.iter())
            .map(|(va, vb)| va.total_cmp(vb))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Returns indices into `items` in ranked order.
    ///
    /// `tie_index[i]` is the tie-break index of `items[i]`; it is only read
    /// with [`TieBreaker::ByIndex`] and must be as long as `items`.
    pub fn rank_indices(&self, items: &[T], tie_index: &[usize], context: &C) -> Vec<usize> {
        let keys: Vec<Vec<f64>> = items
            .iter()
            .map(|item| {
                self.rules
                    .iter()
                    .map(|r| self.quantize(r.key(item, context)))
                    .collect()
            })
            .collect();

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            Self::compare_keys(&keys[a], &keys[b])
                .then_with(|| match self.tie_breaker {
                    TieBreaker::PreserveOrder => Ordering::Equal,
                    TieBreaker::ByIndex => tie_index[a].cmp(&tie_index[b]),
                })
        });
        order
    }

    /// Consumes `items` and returns them in ranked order.
    pub fn rank(&self, items: Vec<T>, tie_index: &[usize], context: &C) -> Vec<T> {
        let order = self.rank_indices(&items, tie_index, context);
        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect()
    }
}

impl<T, C> Default for RankEngine<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        magnitude: f64,
        cost: f64,
    }

    struct MagnitudeAsc;
    impl RankRule<Entry, ()> for MagnitudeAsc {
        fn name(&self) -> &str {
            "MagnitudeAsc"
        }
        fn key(&self, entry: &Entry, _ctx: &()) -> f64 {
            entry.magnitude
        }
    }

    struct CheapestFirst;
    impl RankRule<Entry, ()> for CheapestFirst {
        fn name(&self) -> &str {
            "CheapestFirst"
        }
        fn key(&self, entry: &Entry, _ctx: &()) -> f64 {
            entry.cost
        }
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry { magnitude: 3.0, cost: 1.0 },
            Entry { magnitude: 1.0, cost: 3.0 },
            Entry { magnitude: 2.0, cost: 1.0 },
            Entry { magnitude: 1.0, cost: 2.0 },
        ]
    }

    #[test]
    fn test_single_rule() {
        let engine = RankEngine::new().with_rule(MagnitudeAsc);
        let order = engine.rank_indices(&entries(), &[0, 1, 2, 3], &());
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_second_rule_breaks_ties() {
        let engine = RankEngine::new().with_rule(MagnitudeAsc).with_rule(CheapestFirst);
        let order = engine.rank_indices(&entries(), &[0, 1, 2, 3], &());
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_by_index_tie_breaker() {
        let same = vec![Entry { magnitude: 1.0, cost: 1.0 }; 3];
        let engine = RankEngine::new()
            .with_rule(MagnitudeAsc)
            .with_tie_breaker(TieBreaker::ByIndex);
        let order = engine.rank_indices(&same, &[7, 2, 5], &());
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_epsilon_comparison() {
        let close = vec![
            Entry { magnitude: 1.0 + 1e-12, cost: 1.0 },
            Entry { magnitude: 1.0, cost: 5.0 },
        ];
        let engine = RankEngine::new()
            .with_rule(MagnitudeAsc)
            .with_tie_breaker(TieBreaker::ByIndex);
        assert_eq!(engine.rank_indices(&close, &[0, 1], &()), vec![0, 1]);
    }

    #[test]
    fn test_rank_moves_entries() {
        let engine = RankEngine::new().with_rule(MagnitudeAsc);
        let ranked = engine.rank(entries(), &[0, 1, 2, 3], &());
        let magnitudes: Vec<f64> = ranked.iter().map(|e| e.magnitude).collect();
        assert_eq!(magnitudes, vec![1.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_no_rules_preserves_order() {
        let engine = RankEngine::<Entry, ()>::new();
        assert_eq!(engine.rank_indices(&entries(), &[0, 1, 2, 3], &()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_chained_near_ties_sort_consistently() {
        // Neighbours sit within epsilon of each other, the ends do not.
        let eps = 1e-9;
        let chain: Vec<Entry> = (0..40)
            .rev()
            .map(|i| Entry { magnitude: 1.0 + i as f64 * 0.6e-9, cost: 0.0 })
            .collect();
        let tie_index: Vec<usize> = (0..chain.len()).collect();
        let engine = RankEngine::new()
            .with_rule(MagnitudeAsc)
            .with_tie_breaker(TieBreaker::ByIndex)
            .with_epsilon(eps);

        let order = engine.rank_indices(&chain, &tie_index, &());
        let mut seen = order.clone();
        seen.sort_unstable();
        assert_eq!(seen, tie_index);
        for pair in order.windows(2) {
            assert!(chain[pair[0]].magnitude <= chain[pair[1]].magnitude + eps);
        }
        assert_eq!(order, engine.rank_indices(&chain, &tie_index, &()));
    }
}
