//! Domain operations against the procurement data API.
//!
//! The data API wraps every resource in a named JSON envelope
//! (`{"suppliers": ...}`, `{"frameworkInterest": ...}`) and expects every
//! mutating call to carry the acting user in `updated_by`. Envelope types
//! live here; resource types come from `tenderdesk_core::models`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use tenderdesk_core::models::{
    AgreementUpdate, AuditEvent, ContactInformation, ContactInformationUpdate, Declaration,
    DraftService, Framework, FrameworkAgreement, Service, ServiceStatus, Supplier,
    SupplierFramework, SupplierUpdate, SupplierUser, UserUpdate,
};

use crate::{ClientError, HttpProcurementClient};

/// Search parameters for the supplier listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct SupplierQuery {
    pub supplier_id: Option<i64>,
    pub name_prefix: Option<String>,
    pub duns_number: Option<String>,
    pub company_registration_number: Option<String>,
    pub framework: Option<String>,
    pub page: Option<u32>,
}

impl SupplierQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.supplier_id {
            pairs.push(("supplier_id", id.to_string()));
        }
        if let Some(prefix) = &self.name_prefix {
            pairs.push(("prefix", prefix.clone()));
        }
        if let Some(duns) = &self.duns_number {
            pairs.push(("duns_number", duns.clone()));
        }
        if let Some(number) = &self.company_registration_number {
            pairs.push(("company_registration_number", number.clone()));
        }
        if let Some(framework) = &self.framework {
            pairs.push(("framework", framework.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

/// One page of supplier search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierPage {
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub links: PageLinks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupplierEnvelope {
    suppliers: Supplier,
}

#[derive(Debug, Deserialize)]
struct ContactInformationEnvelope {
    #[serde(rename = "contactInformation")]
    contact_information: ContactInformation,
}

#[derive(Debug, Deserialize)]
struct FrameworkListEnvelope {
    frameworks: Vec<Framework>,
}

#[derive(Debug, Deserialize)]
struct FrameworkEnvelope {
    frameworks: Framework,
}

#[derive(Debug, Deserialize)]
struct SupplierFrameworkListEnvelope {
    #[serde(rename = "frameworkInterest")]
    framework_interest: Vec<SupplierFramework>,
}

#[derive(Debug, Deserialize)]
struct SupplierFrameworkEnvelope {
    #[serde(rename = "frameworkInterest")]
    framework_interest: SupplierFramework,
}

#[derive(Debug, Deserialize)]
struct DeclarationEnvelope {
    declaration: Declaration,
}

#[derive(Debug, Deserialize)]
struct AgreementEnvelope {
    agreement: FrameworkAgreement,
}

#[derive(Debug, Deserialize)]
struct ServiceListEnvelope {
    services: Vec<Service>,
}

#[derive(Debug, Deserialize)]
struct ServiceEnvelope {
    services: Service,
}

#[derive(Debug, Deserialize)]
struct DraftServiceListEnvelope {
    services: Vec<DraftService>,
}

#[derive(Debug, Deserialize)]
struct UserListEnvelope {
    users: Vec<SupplierUser>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    users: SupplierUser,
}

/// The procurement data API operations used by the admin service.
///
/// Every mutating method takes `updated_by`, the acting admin's email, which
/// the data API records against the change.
#[async_trait]
pub trait ProcurementApi: Send + Sync {
    async fn get_supplier(&self, supplier_id: i64) -> Result<Supplier, ClientError>;

    async fn find_suppliers(&self, query: &SupplierQuery) -> Result<SupplierPage, ClientError>;

    async fn update_supplier(
        &self,
        supplier_id: i64,
        update: &SupplierUpdate,
        updated_by: &str,
    ) -> Result<Supplier, ClientError>;

    async fn update_contact_information(
        &self,
        supplier_id: i64,
        contact_id: i64,
        update: &ContactInformationUpdate,
        updated_by: &str,
    ) -> Result<ContactInformation, ClientError>;

    async fn find_frameworks(&self) -> Result<Vec<Framework>, ClientError>;

    async fn get_framework(&self, slug: &str) -> Result<Framework, ClientError>;

    async fn get_supplier_frameworks(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<SupplierFramework>, ClientError>;

    async fn get_supplier_framework(
        &self,
        supplier_id: i64,
        framework_slug: &str,
    ) -> Result<SupplierFramework, ClientError>;

    async fn get_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
    ) -> Result<Declaration, ClientError>;

    /// Replace the whole declaration.
    async fn set_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
        declaration: &Declaration,
        updated_by: &str,
    ) -> Result<Declaration, ClientError>;

    /// Merge the given answers into the stored declaration.
    async fn update_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
        answers: &Declaration,
        updated_by: &str,
    ) -> Result<Declaration, ClientError>;

    async fn get_framework_agreement(
        &self,
        agreement_id: i64,
    ) -> Result<FrameworkAgreement, ClientError>;

    async fn put_agreement_on_hold(
        &self,
        agreement_id: i64,
        updated_by: &str,
    ) -> Result<FrameworkAgreement, ClientError>;

    async fn approve_agreement_for_countersignature(
        &self,
        agreement_id: i64,
        updated_by: &str,
        approving_user_id: i64,
    ) -> Result<FrameworkAgreement, ClientError>;

    async fn unapprove_agreement_for_countersignature(
        &self,
        agreement_id: i64,
        updated_by: &str,
        unapproving_user_id: i64,
    ) -> Result<FrameworkAgreement, ClientError>;

    async fn update_framework_agreement(
        &self,
        agreement_id: i64,
        update: &AgreementUpdate,
        updated_by: &str,
    ) -> Result<FrameworkAgreement, ClientError>;

    async fn find_services(
        &self,
        supplier_id: i64,
        framework_slug: Option<&str>,
        status: Option<ServiceStatus>,
    ) -> Result<Vec<Service>, ClientError>;

    async fn update_service_status(
        &self,
        service_id: &str,
        status: ServiceStatus,
        updated_by: &str,
    ) -> Result<Service, ClientError>;

    async fn find_draft_services(
        &self,
        supplier_id: i64,
        framework_slug: Option<&str>,
    ) -> Result<Vec<DraftService>, ClientError>;

    async fn find_users(&self, supplier_id: i64) -> Result<Vec<SupplierUser>, ClientError>;

    /// Look a user up by email address. Missing users are `None`, not an error.
    async fn get_user_by_email(&self, email: &str)
        -> Result<Option<SupplierUser>, ClientError>;

    async fn update_user(
        &self,
        user_id: i64,
        update: &UserUpdate,
        updated_by: &str,
    ) -> Result<SupplierUser, ClientError>;

    async fn create_audit_event(&self, event: &AuditEvent) -> Result<(), ClientError>;
}

#[async_trait]
impl ProcurementApi for HttpProcurementClient {
    async fn get_supplier(&self, supplier_id: i64) -> Result<Supplier, ClientError> {
        let envelope: SupplierEnvelope = self
            .get(&format!("/suppliers/{}", supplier_id), &[])
            .await?;
        Ok(envelope.suppliers)
    }

    async fn find_suppliers(&self, query: &SupplierQuery) -> Result<SupplierPage, ClientError> {
        self.get("/suppliers", &query.to_pairs()).await
    }

    async fn update_supplier(
        &self,
        supplier_id: i64,
        update: &SupplierUpdate,
        updated_by: &str,
    ) -> Result<Supplier, ClientError> {
        let envelope: SupplierEnvelope = self
            .post_json(
                &format!("/suppliers/{}", supplier_id),
                &json!({"suppliers": update, "updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.suppliers)
    }

    async fn update_contact_information(
        &self,
        supplier_id: i64,
        contact_id: i64,
        update: &ContactInformationUpdate,
        updated_by: &str,
    ) -> Result<ContactInformation, ClientError> {
        let envelope: ContactInformationEnvelope = self
            .post_json(
                &format!(
                    "/suppliers/{}/contact-information/{}",
                    supplier_id, contact_id
                ),
                &json!({"contactInformation": update, "updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.contact_information)
    }

    async fn find_frameworks(&self) -> Result<Vec<Framework>, ClientError> {
        let envelope: FrameworkListEnvelope = self.get("/frameworks", &[]).await?;
        Ok(envelope.frameworks)
    }

    async fn get_framework(&self, slug: &str) -> Result<Framework, ClientError> {
        let envelope: FrameworkEnvelope = self
            .get(&format!("/frameworks/{}", urlencoding::encode(slug)), &[])
            .await?;
        Ok(envelope.frameworks)
    }

    async fn get_supplier_frameworks(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<SupplierFramework>, ClientError> {
        let envelope: SupplierFrameworkListEnvelope = self
            .get(&format!("/suppliers/{}/frameworks", supplier_id), &[])
            .await?;
        Ok(envelope.framework_interest)
    }

    async fn get_supplier_framework(
        &self,
        supplier_id: i64,
        framework_slug: &str,
    ) -> Result<SupplierFramework, ClientError> {
        let envelope: SupplierFrameworkEnvelope = self
            .get(
                &format!(
                    "/suppliers/{}/frameworks/{}",
                    supplier_id,
                    urlencoding::encode(framework_slug)
                ),
                &[],
            )
            .await?;
        Ok(envelope.framework_interest)
    }

    async fn get_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
    ) -> Result<Declaration, ClientError> {
        let envelope: DeclarationEnvelope = self
            .get(
                &format!(
                    "/suppliers/{}/frameworks/{}/declaration",
                    supplier_id,
                    urlencoding::encode(framework_slug)
                ),
                &[],
            )
            .await?;
        Ok(envelope.declaration)
    }

    async fn set_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
        declaration: &Declaration,
        updated_by: &str,
    ) -> Result<Declaration, ClientError> {
        let envelope: DeclarationEnvelope = self
            .post_json(
                &format!(
                    "/suppliers/{}/frameworks/{}/declaration",
                    supplier_id,
                    urlencoding::encode(framework_slug)
                ),
                &json!({"declaration": declaration, "updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.declaration)
    }

    async fn update_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
        answers: &Declaration,
        updated_by: &str,
    ) -> Result<Declaration, ClientError> {
        let envelope: DeclarationEnvelope = self
            .post_json(
                &format!(
                    "/suppliers/{}/frameworks/{}/declaration/update",
                    supplier_id,
                    urlencoding::encode(framework_slug)
                ),
                &json!({"declaration": answers, "updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.declaration)
    }

    async fn get_framework_agreement(
        &self,
        agreement_id: i64,
    ) -> Result<FrameworkAgreement, ClientError> {
        let envelope: AgreementEnvelope = self
            .get(&format!("/agreements/{}", agreement_id), &[])
            .await?;
        Ok(envelope.agreement)
    }

    async fn put_agreement_on_hold(
        &self,
        agreement_id: i64,
        updated_by: &str,
    ) -> Result<FrameworkAgreement, ClientError> {
        let envelope: AgreementEnvelope = self
            .post_json(
                &format!("/agreements/{}/on-hold", agreement_id),
                &json!({"updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.agreement)
    }

    async fn approve_agreement_for_countersignature(
        &self,
        agreement_id: i64,
        updated_by: &str,
        approving_user_id: i64,
    ) -> Result<FrameworkAgreement, ClientError> {
        let envelope: AgreementEnvelope = self
            .post_json(
                &format!("/agreements/{}/approve", agreement_id),
                &json!({
                    "agreement": {"userId": approving_user_id},
                    "updated_by": updated_by,
                }),
            )
            .await?;
        Ok(envelope.agreement)
    }

    async fn unapprove_agreement_for_countersignature(
        &self,
        agreement_id: i64,
        updated_by: &str,
        unapproving_user_id: i64,
    ) -> Result<FrameworkAgreement, ClientError> {
        let envelope: AgreementEnvelope = self
            .post_json(
                &format!("/agreements/{}/unapprove", agreement_id),
                &json!({
                    "agreement": {"userId": unapproving_user_id},
                    "updated_by": updated_by,
                }),
            )
            .await?;
        Ok(envelope.agreement)
    }

    async fn update_framework_agreement(
        &self,
        agreement_id: i64,
        update: &AgreementUpdate,
        updated_by: &str,
    ) -> Result<FrameworkAgreement, ClientError> {
        let envelope: AgreementEnvelope = self
            .post_json(
                &format!("/agreements/{}", agreement_id),
                &json!({"agreement": update, "updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.agreement)
    }

    async fn find_services(
        &self,
        supplier_id: i64,
        framework_slug: Option<&str>,
        status: Option<ServiceStatus>,
    ) -> Result<Vec<Service>, ClientError> {
        let mut query = vec![("supplier_id", supplier_id.to_string())];
        if let Some(slug) = framework_slug {
            query.push(("framework", slug.to_string()));
        }
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        let envelope: ServiceListEnvelope = self.get("/services", &query).await?;
        Ok(envelope.services)
    }

    async fn update_service_status(
        &self,
        service_id: &str,
        status: ServiceStatus,
        updated_by: &str,
    ) -> Result<Service, ClientError> {
        let envelope: ServiceEnvelope = self
            .post_json(
                &format!(
                    "/services/{}/status/{}",
                    urlencoding::encode(service_id),
                    status
                ),
                &json!({"updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.services)
    }

    async fn find_draft_services(
        &self,
        supplier_id: i64,
        framework_slug: Option<&str>,
    ) -> Result<Vec<DraftService>, ClientError> {
        let mut query = vec![("supplier_id", supplier_id.to_string())];
        if let Some(slug) = framework_slug {
            query.push(("framework", slug.to_string()));
        }
        let envelope: DraftServiceListEnvelope = self.get("/draft-services", &query).await?;
        Ok(envelope.services)
    }

    async fn find_users(&self, supplier_id: i64) -> Result<Vec<SupplierUser>, ClientError> {
        let envelope: UserListEnvelope = self
            .get("/users", &[("supplier_id", supplier_id.to_string())])
            .await?;
        Ok(envelope.users)
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SupplierUser>, ClientError> {
        let result: Result<UserListEnvelope, ClientError> = self
            .get("/users", &[("email_address", email.to_string())])
            .await;
        match result {
            Ok(envelope) => Ok(envelope.users.into_iter().next()),
            Err(ClientError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_user(
        &self,
        user_id: i64,
        update: &UserUpdate,
        updated_by: &str,
    ) -> Result<SupplierUser, ClientError> {
        let envelope: UserEnvelope = self
            .post_json(
                &format!("/users/{}", user_id),
                &json!({"users": update, "updated_by": updated_by}),
            )
            .await?;
        Ok(envelope.users)
    }

    async fn create_audit_event(&self, event: &AuditEvent) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .post_json("/audit-events", &json!({"auditEvents": event}))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_query_pairs_skip_unset_fields() {
        let query = SupplierQuery {
            name_prefix: Some("Acme".to_string()),
            page: Some(2),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![("prefix", "Acme".to_string()), ("page", "2".to_string())]
        );
    }

    #[test]
    fn test_supplier_page_defaults_links_when_absent() {
        let page: SupplierPage = serde_json::from_value(serde_json::json!({
            "suppliers": []
        }))
        .expect("page");
        assert!(page.links.next.is_none());
        assert!(page.suppliers.is_empty());
    }

    #[test]
    fn test_framework_interest_envelope_field_name() {
        let envelope: SupplierFrameworkListEnvelope = serde_json::from_value(serde_json::json!({
            "frameworkInterest": []
        }))
        .expect("envelope");
        assert!(envelope.framework_interest.is_empty());
    }
}
