use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A supplier's company registration number as a tagged variant, making the
/// mutual exclusivity of the two wire fields structural.
///
/// The procurement API stores two nullable columns and serializes both keys
/// on every read, so the wire shape stays two `Option<String>` fields on
/// [`Supplier`]; this enum is produced by [`Supplier::company_number`] and
/// consumed by [`SupplierUpdate::company_number`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyNumber {
    CompaniesHouse(String),
    Other(String),
}

impl CompanyNumber {
    pub fn value(&self) -> &str {
        match self {
            CompanyNumber::CompaniesHouse(n) => n,
            CompanyNumber::Other(n) => n,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInformation {
    pub id: i64,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub registered_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companies_house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_company_registration_number: Option<String>,
    #[serde(default)]
    pub duns_number: Option<String>,
    #[serde(default)]
    pub registration_country: Option<String>,
    #[serde(default)]
    pub contact_information: Vec<ContactInformation>,
}

impl Supplier {
    /// The registration number as a tagged variant. A record should never
    /// hold both fields, but if it does the Companies House number wins.
    pub fn company_number(&self) -> Option<CompanyNumber> {
        if let Some(n) = &self.companies_house_number {
            return Some(CompanyNumber::CompaniesHouse(n.clone()));
        }
        self.other_company_registration_number
            .as_ref()
            .map(|n| CompanyNumber::Other(n.clone()))
    }
}

/// Partial update for a supplier record. Only set fields are sent, except
/// the company number: applying one variant explicitly nulls the other so
/// the remote record can never hold both.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_country: Option<String>,
    // Double Option: outer None = untouched, inner None = explicit null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies_house_number: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_company_registration_number: Option<Option<String>>,
}

impl SupplierUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        SupplierUpdate {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn registered_name(name: impl Into<String>) -> Self {
        SupplierUpdate {
            registered_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn registration_country(country: impl Into<String>) -> Self {
        SupplierUpdate {
            registration_country: Some(country.into()),
            ..Default::default()
        }
    }

    /// Set one company number variant and clear the other.
    pub fn company_number(number: CompanyNumber) -> Self {
        match number {
            CompanyNumber::CompaniesHouse(n) => SupplierUpdate {
                companies_house_number: Some(Some(n)),
                other_company_registration_number: Some(None),
                ..Default::default()
            },
            CompanyNumber::Other(n) => SupplierUpdate {
                companies_house_number: Some(None),
                other_company_registration_number: Some(Some(n)),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactInformationUpdate {
    pub address1: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
}
