//! Tenderdesk admin API library
//!
//! This crate provides the HTTP handlers, middleware, and application setup
//! for the marketplace procurement admin service.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod services;
pub mod setup;
mod telemetry;
mod validation;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
