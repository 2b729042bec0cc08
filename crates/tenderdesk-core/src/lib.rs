//! Tenderdesk core library
//!
//! Shared foundation for the tenderdesk admin service: configuration,
//! the unified `AppError` taxonomy, domain models for suppliers, frameworks,
//! agreements, declarations, services and users, and user-visible message
//! constants.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
