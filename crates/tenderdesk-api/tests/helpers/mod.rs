//! Test helpers: in-memory procurement API and storage backing a real
//! router, driven through `axum_test::TestServer`.
//!
//! Run with `cargo test -p tenderdesk-api`.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

use tenderdesk_api::auth::{AdminRole, JwtClaims};
use tenderdesk_api::constants::API_PREFIX;
use tenderdesk_api::setup::routes::setup_routes;
use tenderdesk_api::state::AppState;
use tenderdesk_client::{ClientError, ProcurementApi, SupplierPage, SupplierQuery};
use tenderdesk_content::ContentLoader;
use tenderdesk_core::models::{
    AgreementUpdate, AuditEvent, ContactInformation, ContactInformationUpdate, Declaration,
    DraftService, Framework, FrameworkAgreement, Service, ServiceStatus, Supplier,
    SupplierFramework, SupplierUpdate, SupplierUser, UserUpdate,
};
use tenderdesk_core::Config;
use tenderdesk_storage::{
    SaveOptions, Storage, StorageBackend, StorageError, StorageResult, StoredObject,
};

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Bearer token for an admin with the given role, signed with the test
/// config's secret.
pub fn token_for(role: AdminRole) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: 7,
        email: "admin@example.com".to_string(),
        role,
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"secret"),
    )
    .expect("sign test token")
}

#[derive(Default)]
struct MockApiInner {
    suppliers: HashMap<i64, Supplier>,
    frameworks: Vec<Framework>,
    supplier_frameworks: Vec<SupplierFramework>,
    declarations: HashMap<(i64, String), Declaration>,
    agreements: HashMap<i64, FrameworkAgreement>,
    services: Vec<Service>,
    drafts: Vec<DraftService>,
    users: Vec<SupplierUser>,
    audit_events: Vec<AuditEvent>,
    declaration_writes: u32,
    agreement_updates: Vec<(i64, AgreementUpdate)>,
    service_status_updates: Vec<(String, ServiceStatus)>,
    approvals: Vec<i64>,
}

/// In-memory stand-in for the procurement data API.
#[derive(Default)]
pub struct MockProcurementApi {
    inner: Mutex<MockApiInner>,
}

impl MockProcurementApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_supplier(&self, supplier: Supplier) {
        self.inner
            .lock()
            .unwrap()
            .suppliers
            .insert(supplier.id, supplier);
    }

    pub fn add_framework(&self, framework: Framework) {
        self.inner.lock().unwrap().frameworks.push(framework);
    }

    pub fn add_supplier_framework(&self, sf: SupplierFramework) {
        self.inner.lock().unwrap().supplier_frameworks.push(sf);
    }

    pub fn set_declaration(&self, supplier_id: i64, framework_slug: &str, d: Declaration) {
        self.inner
            .lock()
            .unwrap()
            .declarations
            .insert((supplier_id, framework_slug.to_string()), d);
    }

    pub fn add_agreement(&self, agreement: FrameworkAgreement) {
        self.inner
            .lock()
            .unwrap()
            .agreements
            .insert(agreement.id, agreement);
    }

    pub fn add_service(&self, service: Service) {
        self.inner.lock().unwrap().services.push(service);
    }

    pub fn add_draft(&self, draft: DraftService) {
        self.inner.lock().unwrap().drafts.push(draft);
    }

    pub fn add_user(&self, user: SupplierUser) {
        self.inner.lock().unwrap().users.push(user);
    }

    pub fn declaration_writes(&self) -> u32 {
        self.inner.lock().unwrap().declaration_writes
    }

    pub fn declaration(&self, supplier_id: i64, framework_slug: &str) -> Option<Declaration> {
        self.inner
            .lock()
            .unwrap()
            .declarations
            .get(&(supplier_id, framework_slug.to_string()))
            .cloned()
    }

    pub fn agreement_updates(&self) -> Vec<(i64, AgreementUpdate)> {
        self.inner.lock().unwrap().agreement_updates.clone()
    }

    pub fn service_status_updates(&self) -> Vec<(String, ServiceStatus)> {
        self.inner.lock().unwrap().service_status_updates.clone()
    }

    pub fn audit_events(&self) -> Vec<AuditEvent> {
        self.inner.lock().unwrap().audit_events.clone()
    }

    pub fn approvals(&self) -> Vec<i64> {
        self.inner.lock().unwrap().approvals.clone()
    }

    pub fn supplier(&self, id: i64) -> Option<Supplier> {
        self.inner.lock().unwrap().suppliers.get(&id).cloned()
    }

    pub fn service_status(&self, id: &str) -> Option<ServiceStatus> {
        self.inner
            .lock()
            .unwrap()
            .services
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.status)
    }
}

#[async_trait]
impl ProcurementApi for MockProcurementApi {
    async fn get_supplier(&self, supplier_id: i64) -> Result<Supplier, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .suppliers
            .get(&supplier_id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn find_suppliers(&self, query: &SupplierQuery) -> Result<SupplierPage, ClientError> {
        let inner = self.inner.lock().unwrap();
        let suppliers = inner
            .suppliers
            .values()
            .filter(|s| {
                query.supplier_id.is_none_or(|id| s.id == id)
                    && query
                        .name_prefix
                        .as_deref()
                        .is_none_or(|p| s.name.starts_with(p))
                    && query
                        .duns_number
                        .as_deref()
                        .is_none_or(|d| s.duns_number.as_deref() == Some(d))
            })
            .cloned()
            .collect();
        Ok(SupplierPage {
            suppliers,
            links: Default::default(),
        })
    }

    async fn update_supplier(
        &self,
        supplier_id: i64,
        update: &SupplierUpdate,
        _updated_by: &str,
    ) -> Result<Supplier, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        let supplier = inner
            .suppliers
            .get_mut(&supplier_id)
            .ok_or(ClientError::NotFound)?;
        if let Some(name) = &update.name {
            supplier.name = name.clone();
        }
        if let Some(name) = &update.registered_name {
            supplier.registered_name = Some(name.clone());
        }
        if let Some(country) = &update.registration_country {
            supplier.registration_country = Some(country.clone());
        }
        if let Some(n) = &update.companies_house_number {
            supplier.companies_house_number = n.clone();
        }
        if let Some(n) = &update.other_company_registration_number {
            supplier.other_company_registration_number = n.clone();
        }
        Ok(supplier.clone())
    }

    async fn update_contact_information(
        &self,
        supplier_id: i64,
        contact_id: i64,
        update: &ContactInformationUpdate,
        _updated_by: &str,
    ) -> Result<ContactInformation, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        let supplier = inner
            .suppliers
            .get_mut(&supplier_id)
            .ok_or(ClientError::NotFound)?;
        let contact = supplier
            .contact_information
            .iter_mut()
            .find(|c| c.id == contact_id)
            .ok_or(ClientError::NotFound)?;
        contact.address1 = Some(update.address1.clone());
        contact.city = Some(update.city.clone());
        contact.postcode = Some(update.postcode.clone());
        contact.country = Some(update.country.clone());
        Ok(contact.clone())
    }

    async fn find_frameworks(&self) -> Result<Vec<Framework>, ClientError> {
        Ok(self.inner.lock().unwrap().frameworks.clone())
    }

    async fn get_framework(&self, slug: &str) -> Result<Framework, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .frameworks
            .iter()
            .find(|f| f.slug == slug)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn get_supplier_frameworks(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<SupplierFramework>, ClientError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .supplier_frameworks
            .iter()
            .filter(|sf| sf.supplier_id == supplier_id)
            .cloned()
            .collect())
    }

    async fn get_supplier_framework(
        &self,
        supplier_id: i64,
        framework_slug: &str,
    ) -> Result<SupplierFramework, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .supplier_frameworks
            .iter()
            .find(|sf| sf.supplier_id == supplier_id && sf.framework_slug == framework_slug)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn get_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
    ) -> Result<Declaration, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .declarations
            .get(&(supplier_id, framework_slug.to_string()))
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn set_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
        declaration: &Declaration,
        _updated_by: &str,
    ) -> Result<Declaration, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.declaration_writes += 1;
        inner.declarations.insert(
            (supplier_id, framework_slug.to_string()),
            declaration.clone(),
        );
        Ok(declaration.clone())
    }

    async fn update_supplier_declaration(
        &self,
        supplier_id: i64,
        framework_slug: &str,
        answers: &Declaration,
        _updated_by: &str,
    ) -> Result<Declaration, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.declaration_writes += 1;
        let declaration = inner
            .declarations
            .entry((supplier_id, framework_slug.to_string()))
            .or_default();
        declaration.extend(answers.clone());
        Ok(declaration.clone())
    }

    async fn get_framework_agreement(
        &self,
        agreement_id: i64,
    ) -> Result<FrameworkAgreement, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .agreements
            .get(&agreement_id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn put_agreement_on_hold(
        &self,
        agreement_id: i64,
        _updated_by: &str,
    ) -> Result<FrameworkAgreement, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        let agreement = inner
            .agreements
            .get_mut(&agreement_id)
            .ok_or(ClientError::NotFound)?;
        agreement.status = tenderdesk_core::models::AgreementStatus::OnHold;
        Ok(agreement.clone())
    }

    async fn approve_agreement_for_countersignature(
        &self,
        agreement_id: i64,
        _updated_by: &str,
        _approving_user_id: i64,
    ) -> Result<FrameworkAgreement, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.approvals.push(agreement_id);
        let agreement = inner
            .agreements
            .get_mut(&agreement_id)
            .ok_or(ClientError::NotFound)?;
        agreement.status = tenderdesk_core::models::AgreementStatus::Approved;
        Ok(agreement.clone())
    }

    async fn unapprove_agreement_for_countersignature(
        &self,
        agreement_id: i64,
        _updated_by: &str,
        _unapproving_user_id: i64,
    ) -> Result<FrameworkAgreement, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        let agreement = inner
            .agreements
            .get_mut(&agreement_id)
            .ok_or(ClientError::NotFound)?;
        agreement.status = tenderdesk_core::models::AgreementStatus::Draft;
        Ok(agreement.clone())
    }

    async fn update_framework_agreement(
        &self,
        agreement_id: i64,
        update: &AgreementUpdate,
        _updated_by: &str,
    ) -> Result<FrameworkAgreement, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.agreement_updates.push((agreement_id, update.clone()));
        let agreement = inner
            .agreements
            .get_mut(&agreement_id)
            .ok_or(ClientError::NotFound)?;
        if let Some(path) = &update.countersigned_agreement_path {
            agreement.countersigned_agreement_path = path.clone();
        }
        Ok(agreement.clone())
    }

    async fn find_services(
        &self,
        supplier_id: i64,
        framework_slug: Option<&str>,
        status: Option<ServiceStatus>,
    ) -> Result<Vec<Service>, ClientError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .services
            .iter()
            .filter(|s| {
                s.supplier_id == supplier_id
                    && framework_slug.is_none_or(|f| s.framework_slug == f)
                    && status.is_none_or(|st| s.status == st)
            })
            .cloned()
            .collect())
    }

    async fn update_service_status(
        &self,
        service_id: &str,
        status: ServiceStatus,
        _updated_by: &str,
    ) -> Result<Service, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .service_status_updates
            .push((service_id.to_string(), status));
        let service = inner
            .services
            .iter_mut()
            .find(|s| s.id == service_id)
            .ok_or(ClientError::NotFound)?;
        service.status = status;
        Ok(service.clone())
    }

    async fn find_draft_services(
        &self,
        supplier_id: i64,
        framework_slug: Option<&str>,
    ) -> Result<Vec<DraftService>, ClientError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .drafts
            .iter()
            .filter(|d| {
                d.supplier_id == supplier_id && framework_slug.is_none_or(|f| d.framework_slug == f)
            })
            .cloned()
            .collect())
    }

    async fn find_users(&self, supplier_id: i64) -> Result<Vec<SupplierUser>, ClientError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.supplier_id == Some(supplier_id))
            .cloned()
            .collect())
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SupplierUser>, ClientError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email_address == email)
            .cloned())
    }

    async fn update_user(
        &self,
        user_id: i64,
        update: &UserUpdate,
        _updated_by: &str,
    ) -> Result<SupplierUser, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ClientError::NotFound)?;
        if update.locked == Some(false) {
            user.locked = false;
        }
        if let Some(active) = update.active {
            user.active = active;
        }
        if let Some(supplier_id) = update.supplier_id {
            user.supplier_id = Some(supplier_id);
        }
        if let Some(role) = &update.role {
            user.role = role.clone();
        }
        Ok(user.clone())
    }

    async fn create_audit_event(&self, event: &AuditEvent) -> Result<(), ClientError> {
        self.inner.lock().unwrap().audit_events.push(event.clone());
        Ok(())
    }
}

/// In-memory object store with a switchable failing delete.
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    pub fail_delete: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::copy_from_slice(data));
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn save(&self, key: &str, data: Bytes, _options: SaveOptions) -> StorageResult<()> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn head(&self, key: &str) -> StorageResult<Option<StoredObject>> {
        Ok(self.objects.lock().unwrap().get(key).map(|data| {
            StoredObject {
                size: data.len() as u64,
                last_modified: Utc::now(),
            }
        }))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("simulated failure".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn signed_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        Ok(format!("https://assets.example.com/{}?signed=1", key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Test application: server plus handles to the in-memory backends.
pub struct TestApp {
    pub server: TestServer,
    pub api: Arc<MockProcurementApi>,
    pub storage: Arc<MockStorage>,
    pub content_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Write a manifest file under the content root.
    pub fn write_manifest(&self, framework_slug: &str, kind: &str, manifest: &serde_json::Value) {
        let dir = self.content_dir.path().join(framework_slug);
        std::fs::create_dir_all(&dir).expect("create manifest dir");
        std::fs::write(
            dir.join(format!("{}.json", kind)),
            serde_json::to_vec_pretty(manifest).expect("serialize manifest"),
        )
        .expect("write manifest");
    }
}

/// Setup a test app over the in-memory backends.
pub fn setup_test_app() -> TestApp {
    let content_dir = TempDir::new().expect("create content dir");

    let mut config = Config::for_tests();
    config.content_root = content_dir.path().to_string_lossy().into_owned();

    let api = Arc::new(MockProcurementApi::new());
    let storage = Arc::new(MockStorage::new());
    let content = Arc::new(ContentLoader::new(config.content_root.clone()));

    let state = Arc::new(AppState::new(
        config.clone(),
        api.clone(),
        storage.clone(),
        content,
        None,
    ));

    let router = setup_routes(&config, state).expect("build router");
    let server = TestServer::new(router).expect("create test server");

    TestApp {
        server,
        api,
        storage,
        content_dir,
    }
}
