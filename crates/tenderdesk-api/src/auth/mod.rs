pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, require_roles, AuthState};
pub use models::{AdminContext, AdminRole, JwtClaims};
