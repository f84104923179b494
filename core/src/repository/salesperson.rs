use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::PersistenceError;
use crate::model::directory::{DirectorySnapshot, SalespersonRecord};
use crate::repository::subscription::{DirectorySubscription, DIRECTORY_CHANNEL_CAPACITY};
use crate::repository::traits::SalespersonRepository;

const SALESPERSONS_FILE_NAME: &str = "salespersons.json";

/// Shared `{ "name": ... }` collection, readable by every user.
pub struct FileSalespersonRepository {
    file_path: PathBuf,
    tx: broadcast::Sender<DirectorySnapshot>,
    last_published: Mutex<DirectorySnapshot>,
}

impl FileSalespersonRepository {
    pub fn new(data_dir: &Path) -> Result<Self, PersistenceError> {
        fs::create_dir_all(data_dir)?;
        let (tx, _) = broadcast::channel(DIRECTORY_CHANNEL_CAPACITY);
        let repo = FileSalespersonRepository {
            file_path: data_dir.join(SALESPERSONS_FILE_NAME),
            tx,
            last_published: Mutex::new(DirectorySnapshot::default()),
        };

        if !repo.file_path.exists() {
            repo.write_records(&[])?;
        }
        let current = DirectorySnapshot::from_records(&repo.read_records()?);
        repo.remember(current);
        Ok(repo)
    }

    fn read_records(&self) -> Result<Vec<SalespersonRecord>, PersistenceError> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)?;
        Ok(records)
    }

    fn write_records(&self, records: &[SalespersonRecord]) -> Result<(), PersistenceError> {
        // Readers in other processes only ever see a complete file.
        let tmp = self.file_path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.file_path)?;
        Ok(())
    }

    fn remember(&self, snapshot: DirectorySnapshot) -> bool {
        let mut last = match self.last_published.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last == snapshot {
            return false;
        }
        *last = snapshot;
        true
    }

    fn current(&self) -> DirectorySnapshot {
        match self.last_published.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn publish(&self, snapshot: DirectorySnapshot) {
        if self.remember(snapshot.clone()) {
            // No subscribers is fine.
            let delivered = self.tx.send(snapshot).unwrap_or(0);
            debug!(delivered, "directory snapshot published");
        }
    }

    /// Re-reads the shared file and publishes if another writer changed it.
    pub fn refresh(&self) -> Result<bool, PersistenceError> {
        let snapshot = DirectorySnapshot::from_records(&self.read_records()?);
        let changed = snapshot != self.current();
        if changed {
            self.publish(snapshot);
        }
        Ok(changed)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl SalespersonRepository for FileSalespersonRepository {
    fn register(&self, name: &str) -> Result<(), PersistenceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PersistenceError::InvalidName(name.to_string()));
        }

        let mut records = self.read_records()?;
        if records.iter().any(|r| r.name.trim() == name) {
            debug!(name, "salesperson already registered");
            return Ok(());
        }
        records.push(SalespersonRecord { name: name.to_string() });
        self.write_records(&records)?;
        info!(name, "salesperson registered");

        self.publish(DirectorySnapshot::from_records(&records));
        Ok(())
    }

    /// Anything another writer added since the last publish goes out to the
    /// existing subscribers before the new one joins.
    fn subscribe(&self) -> Result<DirectorySubscription, PersistenceError> {
        let current = DirectorySnapshot::from_records(&self.read_records()?);
        self.publish(current.clone());
        let rx = self.tx.subscribe();
        Ok(DirectorySubscription::new(current, rx))
    }
}
