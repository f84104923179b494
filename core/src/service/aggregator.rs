use crate::model::entry::SaleEntry;
use crate::model::summary::AggregateSummary;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Pure pass over the entries. Totals are recomputed from quantity and price.
pub fn summarize(entries: &[SaleEntry], daily_target: f64) -> AggregateSummary {
    let mut summary = AggregateSummary::default();

    for entry in entries {
        summary.total_entries += 1;
        summary.record_status(entry.status);
        if entry.is_closing() {
            summary.closing_entries += 1;
            summary.total_closed_sales += finite_or_zero(entry.total());
        }
    }

    summary.conversion_rate_percent = if summary.total_entries == 0 {
        0.0
    } else {
        summary.closing_entries as f64 / summary.total_entries as f64 * 100.0
    };

    let target = finite_or_zero(daily_target);
    summary.target_achievement_percent = if target <= 0.0 {
        0.0
    } else {
        finite_or_zero(summary.total_closed_sales / target * 100.0)
    };

    summary
}
