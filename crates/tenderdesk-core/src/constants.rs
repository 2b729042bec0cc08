//! Shared constants and user-visible workflow messages.

/// Standard filename for the buyer's countersignature document.
pub const COUNTERPART_FILENAME: &str = "agreement-countersignature.pdf";

/// Document category under which agreement files are stored.
pub const AGREEMENTS_CATEGORY: &str = "agreements";

/// Manifest kind for supplier declarations.
pub const DECLARATION_MANIFEST: &str = "declaration";

/// Manifest kind for editing services as an admin.
pub const EDIT_SERVICE_AS_ADMIN_MANIFEST: &str = "edit_service_as_admin";

/// Declaration fields holding modern slavery statement document references;
/// rewritten to public asset URLs on read, never persisted rewritten.
pub const MODERN_SLAVERY_FIELDS: [&str; 2] =
    ["modernSlaveryStatement", "modernSlaveryStatementOptional"];

pub const AGREEMENT_ON_HOLD_MESSAGE: &str = "The agreement for {organisation_name} was put on hold.";
pub const AGREEMENT_APPROVED_MESSAGE: &str = "The agreement for {organisation_name} was approved. \
     They will receive a countersigned version soon.";
pub const AGREEMENT_APPROVAL_CANCELLED_MESSAGE: &str =
    "The agreement for {organisation_name} had its approval cancelled. \
     You can approve it again at any time.";
pub const UPLOAD_COUNTERSIGNED_AGREEMENT_MESSAGE: &str =
    "Countersigned agreement file was uploaded";
pub const COUNTERSIGNED_AGREEMENT_NOT_PDF_MESSAGE: &str =
    "Countersigned agreement file is not a PDF";
pub const SUPPLIER_SERVICES_SUSPENDED_MESSAGE: &str =
    "You suspended all {framework_name} services for '{supplier_name}'.";
pub const SUPPLIER_SERVICES_UNSUSPENDED_MESSAGE: &str =
    "You unsuspended all {framework_name} services for '{supplier_name}'.";
pub const SUPPLIER_SERVICES_DELAYED_INDEX_MESSAGE: &str =
    "Search results may take a few minutes to be updated.";
pub const SUPPLIER_DETAILS_UPDATED_MESSAGE: &str =
    "The details for '{supplier_name}' have been updated.";
pub const USER_INVITED_MESSAGE: &str = "User invited";
pub const USER_MOVED_MESSAGE: &str = "User moved to this supplier";
pub const USER_NOT_MOVED_MESSAGE: &str = "User not moved to this supplier - please check you \
     entered the address of an existing supplier user";

/// Substitute `{organisation_name}`, `{supplier_name}` and `{framework_name}`
/// placeholders in a message template.
pub fn render_message(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in pairs {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}
