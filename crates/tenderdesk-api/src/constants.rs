//! API constants.

/// Base path prefix for all admin routes.
pub const API_PREFIX: &str = "/admin/v1";
