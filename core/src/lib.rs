pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod identity;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use config::AppConfig;
pub use error::{
    AuthError, ConfigError, ExportError, PersistenceError, ReportError, ReportResult, ValidationError,
};
pub use export::{export_report, ExportOptions, ExportedReport};
pub use format::{format_percent, CurrencyFormat};
pub use identity::{resolve_identity, Identity};
pub use input::{details_from_args, entry_draft_from_args, expand_key, parse_args, ParsedInput};
pub use model::directory::{DirectorySnapshot, SalespersonDirectory};
pub use model::entry::{EntryDraft, NewEntry, SaleEntry, SaleStatus};
pub use model::report::{ReportDetails, ReportKey, ReportState, StoredReport};
pub use model::summary::{AchievementTier, AggregateSummary, StatusCount};
pub use repository::{
    DirectorySubscription, FileReportRepository, FileSalespersonRepository, ReportRepository,
    SalespersonRepository,
};
pub use service::aggregator::summarize;
pub use service::directory_service::DirectoryService;
pub use service::dto::{EntryView, SummaryView};
pub use service::report_session::{LoadTicket, ReportSession};
pub use time::{parse_entry_time, parse_report_date};
