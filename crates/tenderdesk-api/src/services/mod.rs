pub mod agreements;
pub mod declarations;
pub mod drafts;
pub mod email;
pub mod service_toggle;
