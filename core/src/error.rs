use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No data directory could be resolved. The whole session is unusable.
    #[error("report store is not configured: set store.data_dir, SALES_REPORT_HOME or a home directory")]
    Missing,

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid user id '{0}': only letters, digits, '-' and '_' are allowed")]
    InvalidUserId(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid salesperson name: '{0}'")]
    InvalidName(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("customer name is required")]
    MissingCustomer,

    #[error("product name is required")]
    MissingProduct,

    #[error("salesperson name is required")]
    MissingSalesperson,

    #[error("quantity must be a whole number >= 0, got '{0}'")]
    InvalidQuantity(String),

    #[error("unit price must be a number >= 0, got '{0}'")]
    InvalidUnitPrice(String),

    #[error("time must be HH:MM, got '{0}'")]
    InvalidTime(String),

    #[error("daily target must be a number >= 0, got '{0}'")]
    InvalidTarget(String),

    #[error("could not parse date '{0}'")]
    InvalidDate(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("ambiguous field '{key}' matches {candidates:?}")]
    AmbiguousField { key: String, candidates: Vec<String> },

    #[error("no entry with number {0}")]
    NoSuchEntry(u32),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report has no entries to export")]
    EmptyReport,

    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ReportError {
    /// Only a missing store configuration ends the session; everything else
    /// is shown to the user and the session carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReportError::Config(ConfigError::Missing))
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
