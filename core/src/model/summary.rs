use serde::{Deserialize, Serialize};

use crate::model::entry::SaleStatus;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StatusCount {
    pub status: SaleStatus,
    pub count: usize,
}

/// Derived from a report on every read. Never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AggregateSummary {
    pub total_closed_sales: f64,
    pub total_entries: usize,
    pub closing_entries: usize,
    pub conversion_rate_percent: f64,
    pub target_achievement_percent: f64,
    pub status_counts: Vec<StatusCount>, // first-seen order
}

impl AggregateSummary {
    pub fn tier(&self) -> AchievementTier {
        AchievementTier::from_percent(self.target_achievement_percent)
    }

    pub fn count_of(&self, status: SaleStatus) -> usize {
        self.status_counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Bump the tally for `status`, keeping first-seen order.
    pub fn record_status(&mut self, status: SaleStatus) {
        match self.status_counts.iter_mut().find(|c| c.status == status) {
            Some(existing) => existing.count += 1,
            None => self.status_counts.push(StatusCount { status, count: 1 }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementTier {
    Success,
    Warning,
    Danger,
}

impl AchievementTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            AchievementTier::Success
        } else if percent >= 80.0 {
            AchievementTier::Warning
        } else {
            AchievementTier::Danger
        }
    }
}
