//! Period-overlap cost aggregation.
//!
//! A subscription is billed its full price for every month in which its
//! active range and the queried period overlap, both boundary months
//! included. Open-ended subscriptions are billed up to the end of the period
//! and never beyond it.

use super::error::{SubscriptionError, SubscriptionResult};
use super::model::{QueryPeriod, Subscription};
use super::month::MonthValue;

/// Number of billable months `subscription` has inside `period`; 0 when the
/// ranges do not overlap.
pub fn billable_months(subscription: &Subscription, period: &QueryPeriod) -> i64 {
    let effective_end = subscription.end_month.unwrap_or(period.end());

    let overlap_start = MonthValue::max(period.start(), subscription.start_month);
    let overlap_end = MonthValue::min(period.end(), effective_end);

    if overlap_start.index() > overlap_end.index() {
        return 0;
    }

    i64::from(overlap_end.index() - overlap_start.index() + 1)
}

/// Sum of `price * billable_months` over all subscriptions.
///
/// Rows outside the period contribute nothing, so callers may pass an
/// over-inclusive candidate set. A sum that does not fit in `i64` is an
/// error, never a wrapped value.
pub fn compute_total(
    subscriptions: &[Subscription],
    period: &QueryPeriod,
) -> SubscriptionResult<i64> {
    subscriptions.iter().try_fold(0i64, |total, subscription| {
        billable_months(subscription, period)
            .checked_mul(subscription.price)
            .and_then(|cost| total.checked_add(cost))
            .ok_or(SubscriptionError::TotalOverflow)
    })
}
