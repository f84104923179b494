pub mod report;
pub mod salesperson;
pub mod subscription;
pub mod traits;

// Re-export
pub use report::FileReportRepository;
pub use salesperson::FileSalespersonRepository;
pub use subscription::DirectorySubscription;
pub use traits::{ReportRepository, SalespersonRepository};
