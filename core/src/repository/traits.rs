use crate::error::PersistenceError;
use crate::model::report::{ReportKey, ReportState, StoredReport};
use crate::repository::subscription::DirectorySubscription;

pub trait ReportRepository {
    /// `Ok(None)` when nothing was ever saved under `key`.
    fn load(&self, key: &ReportKey) -> Result<Option<StoredReport>, PersistenceError>;
    /// Replaces whatever was stored under `state.key()`.
    fn save(&self, state: &ReportState) -> Result<StoredReport, PersistenceError>;
}

pub trait SalespersonRepository {
    fn register(&self, name: &str) -> Result<(), PersistenceError>;
    /// Live feed of the shared directory. The first item is the current snapshot.
    fn subscribe(&self) -> Result<DirectorySubscription, PersistenceError>;
}

impl<R: ReportRepository + ?Sized> ReportRepository for &R {
    fn load(&self, key: &ReportKey) -> Result<Option<StoredReport>, PersistenceError> {
        (**self).load(key)
    }

    fn save(&self, state: &ReportState) -> Result<StoredReport, PersistenceError> {
        (**self).save(state)
    }
}

impl<R: SalespersonRepository + ?Sized> SalespersonRepository for &R {
    fn register(&self, name: &str) -> Result<(), PersistenceError> {
        (**self).register(name)
    }

    fn subscribe(&self) -> Result<DirectorySubscription, PersistenceError> {
        (**self).subscribe()
    }
}
