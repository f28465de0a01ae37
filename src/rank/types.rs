//! Core trait for ranking rules.

/// A rule that assigns an ordering key to an item.
///
/// Rules return `f64` keys where **lower sorts first**. To rank by a
/// quantity in descending order, return its negation.
///
/// # Type Parameters
///
/// * `T` - The item type being ranked
/// * `C` - Context the rule may consult
///
/// # Examples
///
/// ```
/// use u_wefe::rank::RankRule;
///
/// struct ByMagnitude;
///
/// impl RankRule<(String, f64), ()> for ByMagnitude {
///     fn name(&self) -> &str { "Magnitude" }
///     fn key(&self, item: &(String, f64), _ctx: &()) -> f64 { item.1 }
/// }
/// ```
pub trait RankRule<T, C>: Send + Sync {
    fn name(&self) -> &str;

    /// Ordering key for `item`. Lower sorts first.
    fn key(&self, item: &T, context: &C) -> f64;
}
