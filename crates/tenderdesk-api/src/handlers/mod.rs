pub mod agreements;
pub mod declarations;
pub mod drafts;
pub mod services;
pub mod suppliers;
pub mod users;
