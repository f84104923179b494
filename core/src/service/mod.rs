pub mod aggregator;
pub mod directory_service;
pub mod dto;
pub mod report_session;
