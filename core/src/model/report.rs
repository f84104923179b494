use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::model::entry::{NewEntry, SaleEntry};

/// Identifies one report document: one salesperson on one day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub date: NaiveDate,
    pub salesperson: String,
}

impl ReportKey {
    pub fn new(date: NaiveDate, salesperson: impl Into<String>) -> Self {
        Self {
            date,
            salesperson: salesperson.into(),
        }
    }

    /// Legacy `"{date}_{salesperson}"` form. For display only, never parsed back.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.date.format("%Y-%m-%d"), self.salesperson)
    }
}

impl std::fmt::Display for ReportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.date.format("%Y-%m-%d"), self.salesperson)
    }
}

/// Editable report header fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDetails {
    pub daily_target: f64,
    pub area: String,
    pub team: String,
    pub contact: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportState {
    pub date: NaiveDate,
    pub salesperson_name: String,
    #[serde(default)]
    pub daily_target: f64,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub entries: Vec<SaleEntry>,
}

impl ReportState {
    /// Fresh report for a key that has never been saved. Nothing carries over.
    pub fn empty(key: &ReportKey) -> Self {
        Self {
            date: key.date,
            salesperson_name: key.salesperson.clone(),
            daily_target: 0.0,
            area: String::new(),
            team: String::new(),
            contact: String::new(),
            entries: Vec::new(),
        }
    }

    pub fn key(&self) -> ReportKey {
        ReportKey::new(self.date, self.salesperson_name.clone())
    }

    pub fn details(&self) -> ReportDetails {
        ReportDetails {
            daily_target: self.daily_target,
            area: self.area.clone(),
            team: self.team.clone(),
            contact: self.contact.clone(),
        }
    }

    pub fn apply_details(&mut self, details: ReportDetails) {
        self.daily_target = if details.daily_target.is_finite() {
            details.daily_target.max(0.0)
        } else {
            0.0
        };
        self.area = details.area;
        self.team = details.team;
        self.contact = details.contact;
    }

    pub fn push_entry(&mut self, entry: NewEntry) -> &SaleEntry {
        let next = self.entries.len() as u32 + 1;
        self.entries.push(SaleEntry::new(next, entry));
        &self.entries[self.entries.len() - 1]
    }

    /// Removes by position and renumbers the rest so numbers stay 1..=n.
    pub fn remove_entry(&mut self, index: usize) -> Option<SaleEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn position_of(&self, sequence_number: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.sequence_number == sequence_number)
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.sequence_number = i as u32 + 1;
        }
    }
}

/// A report as held by the store. `created_at` is stamped on every save.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredReport {
    #[serde(flatten)]
    pub state: ReportState,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::sample_entries;

    fn key() -> ReportKey {
        ReportKey::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), "Budi Santoso")
    }

    #[test]
    fn test_document_id() {
        assert_eq!(key().document_id(), "2025-03-14_Budi Santoso");
    }

    #[test]
    fn test_keys_with_separator_in_name_stay_distinct() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let a = ReportKey::new(date, "Ani_Rina");
        let b = ReportKey::new(date, "Ani");
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_has_no_leftovers() {
        let state = ReportState::empty(&key());
        assert_eq!(state.key(), key());
        assert_eq!(state.details(), ReportDetails::default());
        assert!(state.entries.is_empty());
    }

    #[test]
    fn test_push_and_remove_renumbers() {
        let mut state = ReportState::empty(&key());
        for entry in sample_entries() {
            state.push_entry(entry);
        }
        assert_eq!(state.entries.len(), 3);
        assert_eq!(state.entries[2].sequence_number, 3);

        let removed = state.remove_entry(1).unwrap();
        assert_eq!(removed.customer_name, "CV Digital Startup");
        let customers: Vec<_> = state.entries.iter().map(|e| e.customer_name.as_str()).collect();
        assert_eq!(customers, vec!["PT ABC Corp", "Toko Online Makmur"]);
        let numbers: Vec<_> = state.entries.iter().map(|e| e.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2]);

        assert!(state.remove_entry(5).is_none());
    }

    #[test]
    fn test_apply_details_clamps_target() {
        let mut state = ReportState::empty(&key());
        state.apply_details(ReportDetails {
            daily_target: f64::NAN,
            area: "Jakarta".to_string(),
            ..Default::default()
        });
        assert_eq!(state.daily_target, 0.0);
        assert_eq!(state.area, "Jakarta");

        state.apply_details(ReportDetails { daily_target: -5.0, ..Default::default() });
        assert_eq!(state.daily_target, 0.0);
        assert_eq!(state.area, "");
    }
}
