//! Builders for common test data.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use serde_json::json;

use tenderdesk_core::models::{
    AgreementStatus, Declaration, DraftService, Framework, FrameworkAgreement, FrameworkStatus,
    Service, ServiceStatus, Supplier, SupplierFramework, SupplierUser,
};

pub fn supplier(id: i64, name: &str) -> Supplier {
    Supplier {
        id,
        name: name.to_string(),
        registered_name: None,
        companies_house_number: None,
        other_company_registration_number: None,
        duns_number: None,
        registration_country: None,
        contact_information: vec![],
    }
}

pub fn framework(id: i64, slug: &str, name: &str, status: FrameworkStatus) -> Framework {
    Framework {
        id,
        slug: slug.to_string(),
        name: name.to_string(),
        status,
        e_signature_supported: false,
        framework_agreement_version: Some("v1.0".to_string()),
        framework_live_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}

pub fn supplier_framework(supplier_id: i64, framework_slug: &str) -> SupplierFramework {
    SupplierFramework {
        supplier_id,
        framework_slug: framework_slug.to_string(),
        on_framework: true,
        agreement_id: Some(900),
        agreement_returned: true,
        agreement_status: Some(AgreementStatus::Approved),
        agreement_path: Some(format!(
            "{}/{}/agreements/{}-signed-framework-agreement.pdf",
            framework_slug, supplier_id, supplier_id
        )),
        countersigned_path: None,
        declaration: Declaration::new(),
    }
}

pub fn agreement(id: i64, supplier_id: i64, framework_slug: &str) -> FrameworkAgreement {
    FrameworkAgreement {
        id,
        supplier_id,
        framework_slug: framework_slug.to_string(),
        status: AgreementStatus::Approved,
        countersigned_agreement_path: None,
        signed_agreement_returned_at: None,
    }
}

pub fn service(
    id: &str,
    supplier_id: i64,
    supplier_name: &str,
    framework_slug: &str,
    framework_name: &str,
    status: ServiceStatus,
) -> Service {
    Service {
        id: id.to_string(),
        supplier_id,
        supplier_name: supplier_name.to_string(),
        framework_slug: framework_slug.to_string(),
        framework_name: framework_name.to_string(),
        lot_name: "Cloud software".to_string(),
        status,
    }
}

pub fn draft(id: i64, supplier_id: i64, framework_slug: &str) -> DraftService {
    DraftService {
        id,
        supplier_id,
        framework_slug: framework_slug.to_string(),
        lot_name: "Cloud software".to_string(),
        status: ServiceStatus::NotSubmitted,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        answers: Default::default(),
    }
}

pub fn user(id: i64, email: &str, supplier_id: i64) -> SupplierUser {
    SupplierUser {
        id,
        email_address: email.to_string(),
        name: "Test User".to_string(),
        active: true,
        locked: false,
        role: "supplier".to_string(),
        supplier_id: Some(supplier_id),
    }
}

/// Minimal two-question declaration manifest.
pub fn declaration_manifest() -> serde_json::Value {
    json!({
        "sections": [
            {
                "slug": "organisation",
                "name": "Your organisation",
                "questions": [
                    {"id": "nameOfOrganisation", "name": "Organisation name", "number": 1, "type": "text"},
                    {"id": "tradingStatus", "name": "Trading status", "number": 2, "type": "text"}
                ]
            },
            {
                "slug": "grounds",
                "name": "Grounds for exclusion",
                "questions": [
                    {"id": "misleadingInformation", "name": "Misleading information", "number": 3, "type": "boolean"}
                ]
            }
        ]
    })
}

/// Service-edit manifest with one required and one optional question.
pub fn service_manifest() -> serde_json::Value {
    json!({
        "sections": [
            {
                "slug": "about",
                "name": "About the service",
                "questions": [
                    {"id": "serviceName", "name": "Service name", "number": 1, "type": "text"},
                    {"id": "serviceSummary", "name": "Summary", "number": 2, "type": "textarea"},
                    {"id": "serviceVideo", "name": "Video", "number": 3, "type": "text", "optional": true}
                ]
            }
        ]
    })
}
