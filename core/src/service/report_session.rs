use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{ExportError, PersistenceError, ReportResult, ValidationError};
use crate::export::{export_report, ExportOptions, ExportedReport};
use crate::model::entry::{NewEntry, SaleEntry};
use crate::model::report::{ReportDetails, ReportKey, ReportState, StoredReport};
use crate::model::summary::AggregateSummary;
use crate::repository::ReportRepository;
use crate::service::aggregator::summarize;

/// Proof that a load was requested for a key. Only the newest ticket may
/// replace the session state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket {
    pub key: ReportKey,
    generation: u64,
}

/// The report currently being worked on, and the store it syncs with.
///
/// Every mutation is followed by one full save. Saves can't overlap because
/// they all go through `&mut self`.
pub struct ReportSession<R: ReportRepository> {
    repo: R,
    state: ReportState,
    created_at: Option<DateTime<Utc>>,
    generation: u64,
    dirty: bool,
}

impl<R: ReportRepository> ReportSession<R> {
    /// Opens `key`, starting from an empty report when the store has none.
    pub fn open(repo: R, key: ReportKey) -> Result<Self, PersistenceError> {
        let mut session = Self {
            repo,
            state: ReportState::empty(&key),
            created_at: None,
            generation: 0,
            dirty: false,
        };
        session.switch_to(key)?;
        Ok(session)
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn key(&self) -> ReportKey {
        self.state.key()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// True when the last save failed and memory is ahead of the store.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Switches to `key` right away with an empty report, so nothing from the
    /// previous report stays visible while the load is pending.
    pub fn select(&mut self, key: ReportKey) -> LoadTicket {
        self.generation += 1;
        self.state = ReportState::empty(&key);
        self.created_at = None;
        self.dirty = false;
        debug!(report = %key.document_id(), generation = self.generation, "report selected");
        LoadTicket {
            key,
            generation: self.generation,
        }
    }

    pub fn fetch(&self, ticket: &LoadTicket) -> Result<Option<StoredReport>, PersistenceError> {
        self.repo.load(&ticket.key)
    }

    /// Applies a finished load. Returns `Ok(false)` when the ticket is stale
    /// and the result was dropped.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<StoredReport>, PersistenceError>,
    ) -> Result<bool, PersistenceError> {
        if ticket.generation != self.generation {
            debug!(report = %ticket.key.document_id(), "stale load discarded");
            return Ok(false);
        }

        match result? {
            Some(stored) => {
                self.state = stored.state;
                self.created_at = Some(stored.created_at);
            }
            None => {
                self.state = ReportState::empty(&ticket.key);
                self.created_at = None;
            }
        }
        Ok(true)
    }

    pub fn switch_to(&mut self, key: ReportKey) -> Result<(), PersistenceError> {
        let ticket = self.select(key);
        let result = self.fetch(&ticket);
        self.complete_load(ticket, result)?;
        Ok(())
    }

    /// Writes the whole report. Failures are reported once and not retried.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        match self.repo.save(&self.state) {
            Ok(stored) => {
                self.created_at = Some(stored.created_at);
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                warn!(report = %self.state.key().document_id(), error = %e, "save failed");
                self.dirty = true;
                Err(e)
            }
        }
    }

    pub fn add_entry(&mut self, entry: NewEntry) -> ReportResult<SaleEntry> {
        let added = self.state.push_entry(entry).clone();
        self.save()?;
        Ok(added)
    }

    pub fn add_entries(&mut self, entries: Vec<NewEntry>) -> ReportResult<usize> {
        let count = entries.len();
        for entry in entries {
            self.state.push_entry(entry);
        }
        self.save()?;
        Ok(count)
    }

    /// Removes by position, then saves the remaining report once.
    pub fn delete_entry(&mut self, index: usize) -> ReportResult<SaleEntry> {
        let removed = self
            .state
            .remove_entry(index)
            .ok_or(ValidationError::NoSuchEntry(index as u32 + 1))?;
        self.save()?;
        Ok(removed)
    }

    pub fn delete_entry_number(&mut self, sequence_number: u32) -> ReportResult<SaleEntry> {
        let index = self
            .state
            .position_of(sequence_number)
            .ok_or(ValidationError::NoSuchEntry(sequence_number))?;
        self.delete_entry(index)
    }

    pub fn clear_entries(&mut self) -> ReportResult<usize> {
        let count = self.state.entries.len();
        self.state.entries.clear();
        self.save()?;
        Ok(count)
    }

    pub fn set_details(&mut self, details: ReportDetails) -> ReportResult<()> {
        self.state.apply_details(details);
        self.save()?;
        Ok(())
    }

    pub fn summary(&self) -> AggregateSummary {
        summarize(&self.state.entries, self.state.daily_target)
    }

    pub fn export(&self, options: &ExportOptions) -> Result<ExportedReport, ExportError> {
        export_report(&self.state, &self.summary(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::sample_entries;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockReportRepo {
        reports: RefCell<HashMap<ReportKey, StoredReport>>,
        writes: RefCell<Vec<ReportState>>,
        fail_saves: bool,
    }

    impl ReportRepository for MockReportRepo {
        fn load(&self, key: &ReportKey) -> Result<Option<StoredReport>, PersistenceError> {
            Ok(self.reports.borrow().get(key).cloned())
        }

        fn save(&self, state: &ReportState) -> Result<StoredReport, PersistenceError> {
            if self.fail_saves {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "offline").into());
            }
            let stored = StoredReport {
                state: state.clone(),
                created_at: Utc::now(),
            };
            self.reports.borrow_mut().insert(state.key(), stored.clone());
            self.writes.borrow_mut().push(state.clone());
            Ok(stored)
        }
    }

    fn key(day: u32, name: &str) -> ReportKey {
        ReportKey::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap(), name)
    }

    fn details() -> ReportDetails {
        ReportDetails {
            daily_target: 15_000_000.0,
            area: "Jakarta".to_string(),
            team: "Team Alpha".to_string(),
            contact: "budi@example.com".to_string(),
        }
    }

    fn filled_session(repo: &MockReportRepo) -> ReportSession<&MockReportRepo> {
        let mut session = ReportSession::open(repo, key(14, "Budi")).unwrap();
        session.set_details(details()).unwrap();
        session.add_entries(sample_entries()).unwrap();
        session
    }

    #[test]
    fn test_open_unknown_key_is_empty() {
        let repo = MockReportRepo::default();
        let session = ReportSession::open(&repo, key(14, "Budi")).unwrap();
        assert_eq!(session.state(), &ReportState::empty(&key(14, "Budi")));
        assert!(session.created_at().is_none());
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn test_every_mutation_saves_full_state() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);
        let added = session.add_entry(sample_entries().remove(0)).unwrap();
        assert_eq!(added.sequence_number, 4);

        let writes = repo.writes.borrow();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes.last().unwrap(), session.state());
    }

    #[test]
    fn test_delete_keeps_order_and_writes_once() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);
        let before = repo.writes.borrow().len();

        let removed = session.delete_entry(1).unwrap();
        assert_eq!(removed.customer_name, "CV Digital Startup");

        let writes = repo.writes.borrow();
        assert_eq!(writes.len(), before + 1);
        let customers: Vec<_> = writes.last().unwrap().entries.iter().map(|e| e.customer_name.clone()).collect();
        assert_eq!(customers, vec!["PT ABC Corp", "Toko Online Makmur"]);
    }

    #[test]
    fn test_delete_missing_entry_does_not_write() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);
        let before = repo.writes.borrow().len();

        let err = session.delete_entry_number(9).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Validation(ValidationError::NoSuchEntry(9))));
        assert_eq!(repo.writes.borrow().len(), before);
    }

    #[test]
    fn test_switch_to_unseen_key_does_not_leak() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);

        session.switch_to(key(15, "Budi")).unwrap();
        let state = session.state();
        assert!(state.entries.is_empty());
        assert_eq!(state.details(), ReportDetails::default());
        assert_eq!(state.key(), key(15, "Budi"));

        session.switch_to(key(14, "Ani")).unwrap();
        assert!(session.state().entries.is_empty());
        assert_eq!(session.state().daily_target, 0.0);
    }

    #[test]
    fn test_switch_back_reloads_saved_report() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);
        let saved = session.state().clone();

        session.switch_to(key(15, "Budi")).unwrap();
        session.switch_to(key(14, "Budi")).unwrap();
        assert_eq!(session.state(), &saved);
        assert!(session.created_at().is_some());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);

        let slow = session.select(key(14, "Budi"));
        let slow_result = session.fetch(&slow);
        let fast = session.select(key(16, "Budi"));
        let fast_result = session.fetch(&fast);

        assert!(session.complete_load(fast, fast_result).unwrap());
        assert!(!session.complete_load(slow, slow_result).unwrap());
        assert_eq!(session.key(), key(16, "Budi"));
        assert!(session.state().entries.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_memory_and_marks_dirty() {
        let repo = MockReportRepo {
            fail_saves: true,
            ..Default::default()
        };
        let mut session = ReportSession::open(&repo, key(14, "Budi")).unwrap();
        let err = session.add_entry(sample_entries().remove(0)).unwrap_err();

        assert!(matches!(err, crate::error::ReportError::Persistence(_)));
        assert!(!err.is_fatal());
        assert!(session.is_dirty());
        assert_eq!(session.state().entries.len(), 1);
    }

    #[test]
    fn test_summary_and_export_follow_state() {
        let repo = MockReportRepo::default();
        let mut session = filled_session(&repo);
        assert_eq!(session.summary().total_closed_sales, 9_500_000.0);
        assert!(session.export(&ExportOptions::default()).is_ok());

        session.clear_entries().unwrap();
        assert_eq!(session.summary().total_entries, 0);
        assert!(matches!(session.export(&ExportOptions::default()), Err(ExportError::EmptyReport)));
    }
}
