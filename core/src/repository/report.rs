use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::PersistenceError;
use crate::model::report::{ReportKey, ReportState, StoredReport};
use crate::repository::traits::ReportRepository;

const REPORTS_FILE_NAME: &str = "sales_reports.json";
const USERS_DIR: &str = "users";

/// Per-user report collection kept as one JSON array.
#[derive(Clone)]
pub struct FileReportRepository {
    file_path: PathBuf,
}

impl FileReportRepository {
    pub fn new(data_dir: &Path, user_id: &str) -> Result<Self, PersistenceError> {
        let mut path = data_dir.join(USERS_DIR).join(user_id);
        fs::create_dir_all(&path)?;
        path.push(REPORTS_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<StoredReport>::new())?;
            writer.flush()?;
        }

        Ok(FileReportRepository { file_path: path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_reports(&self) -> Result<Vec<StoredReport>, PersistenceError> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let reports = serde_json::from_reader(reader)?;
        Ok(reports)
    }

    fn write_reports(&self, reports: &[StoredReport]) -> Result<(), PersistenceError> {
        // Write next to the target and rename so a crash never leaves half a file.
        let tmp = self.file_path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, reports)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.file_path)?;
        Ok(())
    }

    pub fn list_keys(&self) -> Result<Vec<ReportKey>, PersistenceError> {
        let mut keys: Vec<ReportKey> = self.read_reports()?.iter().map(|r| r.state.key()).collect();
        keys.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.salesperson.cmp(&b.salesperson)));
        Ok(keys)
    }
}

impl ReportRepository for FileReportRepository {
    fn load(&self, key: &ReportKey) -> Result<Option<StoredReport>, PersistenceError> {
        let found = self
            .read_reports()?
            .into_iter()
            .find(|r| r.state.date == key.date && r.state.salesperson_name == key.salesperson);
        debug!(report = %key.document_id(), found = found.is_some(), "report loaded");
        Ok(found)
    }

    /// Re-reads the collection right before writing, so other keys saved
    /// meanwhile survive. Two processes saving at the same instant can still
    /// lose one write.
    fn save(&self, state: &ReportState) -> Result<StoredReport, PersistenceError> {
        let key = state.key();
        let stored = StoredReport {
            state: state.clone(),
            created_at: Utc::now(),
        };

        let mut reports = self.read_reports()?;
        if let Some(pos) = reports.iter().position(|r| r.state.key() == key) {
            reports[pos] = stored.clone();
        } else {
            reports.push(stored.clone());
        }
        self.write_reports(&reports)?;

        info!(report = %key.document_id(), entries = state.entries.len(), "report saved");
        Ok(stored)
    }
}
