pub mod directory;
pub mod entry;
pub mod report;
pub mod sample;
pub mod summary;
