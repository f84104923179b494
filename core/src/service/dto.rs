use serde::{Deserialize, Serialize};

use crate::format::{format_percent, CurrencyFormat};
use crate::model::entry::SaleEntry;
use crate::model::summary::{AchievementTier, AggregateSummary};

/// One table row, already formatted for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntryView {
    pub number: u32,
    pub time: String,
    pub customer: String,
    pub product: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total: String,
    pub status: String, // icon + label
    pub note: String,
    pub proof: String,
}

impl EntryView {
    pub fn from_entity(entry: &SaleEntry, currency: &CurrencyFormat) -> Self {
        Self {
            number: entry.sequence_number,
            time: entry.time.format("%H:%M").to_string(),
            customer: entry.customer_name.clone(),
            product: entry.product_name.clone(),
            quantity: entry.quantity,
            unit_price: currency.format(entry.unit_price),
            total: currency.format(entry.total()),
            status: format!("{} {}", entry.status.icon(), entry.status.label()),
            note: entry.note.clone(),
            proof: entry.proof_reference.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub total_sales: String,
    pub total_prospects: usize,
    pub conversion_rate: String,
    pub target_achievement: String,
    pub tier: AchievementTier,
    pub status_breakdown: Vec<(String, usize)>,
}

impl SummaryView {
    pub fn from_summary(summary: &AggregateSummary, currency: &CurrencyFormat) -> Self {
        Self {
            total_sales: currency.format(summary.total_closed_sales),
            total_prospects: summary.total_entries,
            conversion_rate: format_percent(summary.conversion_rate_percent),
            target_achievement: format_percent(summary.target_achievement_percent),
            tier: summary.tier(),
            status_breakdown: summary
                .status_counts
                .iter()
                .map(|c| (format!("{} {}", c.status.icon(), c.status.label()), c.count))
                .collect(),
        }
    }
}
