//! Engagement arithmetic.

/// Round to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Interactions per view, as a percentage rounded to two decimals.
///
/// Returns `None` when there is no positive view count, or when none of the
/// interaction counters were reported. Counters that are missing while
/// others are present count as zero.
pub fn engagement_rate(views: Option<f64>, interactions: &[Option<f64>]) -> Option<f64> {
    let views = views.filter(|v| *v > 0.0)?;
    if interactions.iter().all(Option::is_none) {
        return None;
    }
    let total: f64 = interactions.iter().flatten().sum();
    Some(round2(total / views * 100.0))
}
