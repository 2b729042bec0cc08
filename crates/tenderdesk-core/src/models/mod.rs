//! Domain models for the procurement admin service.

pub mod agreement;
pub mod audit;
pub mod framework;
pub mod service;
pub mod supplier;
pub mod supplier_framework;
pub mod user;

pub use agreement::{AgreementStatus, AgreementUpdate, FrameworkAgreement};
pub use audit::{AuditEvent, AuditType};
pub use framework::{Framework, FrameworkStatus};
pub use service::{DraftService, Service, ServiceStatus};
pub use supplier::{
    CompanyNumber, ContactInformation, ContactInformationUpdate, Supplier, SupplierUpdate,
};
pub use supplier_framework::{Declaration, SupplierFramework};
pub use user::{SupplierUser, UserUpdate};
