use tracing::debug;

use crate::error::PersistenceError;
use crate::model::directory::SalespersonDirectory;
use crate::repository::{DirectorySubscription, SalespersonRepository};

/// Owns the known salesperson names for this process and keeps them in
/// step with the shared store.
pub struct DirectoryService<R: SalespersonRepository> {
    repo: R,
    directory: SalespersonDirectory,
    subscription: Option<DirectorySubscription>,
}

impl<R: SalespersonRepository> DirectoryService<R> {
    pub fn new<I, S>(repo: R, seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            repo,
            directory: SalespersonDirectory::with_seed(seed),
            subscription: None,
        }
    }

    /// Subscribes to the shared directory and applies the current snapshot.
    pub fn connect(&mut self) -> Result<usize, PersistenceError> {
        if self.subscription.is_none() {
            self.subscription = Some(self.repo.subscribe()?);
        }
        Ok(self.sync())
    }

    /// Applies every snapshot received since the last call. Returns how many
    /// names were new.
    pub fn sync(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };
        let mut added = 0;
        while let Some(snapshot) = subscription.try_next() {
            added += self.directory.merge(&snapshot);
        }
        if added > 0 {
            debug!(added, total = self.directory.len(), "directory updated");
        }
        added
    }

    pub fn register(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.repo.register(name)?;
        self.directory.insert(name);
        self.sync();
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn directory(&self) -> &SalespersonDirectory {
        &self.directory
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::directory::DirectorySnapshot;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use tokio::sync::broadcast;

    struct MockSalespersonRepo {
        names: RefCell<BTreeSet<String>>,
        tx: broadcast::Sender<DirectorySnapshot>,
    }

    impl MockSalespersonRepo {
        fn new(names: &[&str]) -> Self {
            let (tx, _) = broadcast::channel(8);
            Self {
                names: RefCell::new(names.iter().map(|s| s.to_string()).collect()),
                tx,
            }
        }

        fn snapshot(&self) -> DirectorySnapshot {
            DirectorySnapshot { names: self.names.borrow().clone() }
        }

        // Someone else registering through the shared store.
        fn remote_register(&self, name: &str) {
            self.names.borrow_mut().insert(name.to_string());
            let _ = self.tx.send(self.snapshot());
        }
    }

    impl SalespersonRepository for MockSalespersonRepo {
        fn register(&self, name: &str) -> Result<(), PersistenceError> {
            self.remote_register(name);
            Ok(())
        }

        fn subscribe(&self) -> Result<DirectorySubscription, PersistenceError> {
            Ok(DirectorySubscription::new(self.snapshot(), self.tx.subscribe()))
        }
    }

    fn names<R: SalespersonRepository>(service: &DirectoryService<R>) -> Vec<String> {
        service.directory().names().map(str::to_string).collect()
    }

    #[test]
    fn test_connect_merges_seed_and_remote() {
        let repo = MockSalespersonRepo::new(&["Budi"]);
        let mut service = DirectoryService::new(&repo, ["Andi"]);
        assert_eq!(service.connect().unwrap(), 1);
        assert_eq!(names(&service), vec!["Andi", "Budi"]);
    }

    #[test]
    fn test_remote_registrations_arrive_on_sync() {
        let repo = MockSalespersonRepo::new(&[]);
        let mut service = DirectoryService::new(&repo, ["Andi"]);
        service.connect().unwrap();

        repo.remote_register("Citra");
        repo.remote_register("Dewi");
        assert_eq!(service.sync(), 2);
        assert_eq!(names(&service), vec!["Andi", "Citra", "Dewi"]);
    }

    #[test]
    fn test_register_is_visible_immediately() {
        let repo = MockSalespersonRepo::new(&[]);
        let mut service = DirectoryService::new(&repo, Vec::<String>::new());
        service.register("Eko").unwrap();
        assert!(service.directory().contains("Eko"));
    }

    #[test]
    fn test_disconnect_stops_updates() {
        let repo = MockSalespersonRepo::new(&[]);
        let mut service = DirectoryService::new(&repo, Vec::<String>::new());
        service.connect().unwrap();
        service.disconnect();
        assert!(!service.is_connected());
        assert_eq!(repo.tx.receiver_count(), 0);

        repo.remote_register("Fajar");
        assert_eq!(service.sync(), 0);
        assert!(!service.directory().contains("Fajar"));
    }
}
