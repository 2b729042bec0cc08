//! Document key layout shared by all storage backends.
//!
//! Key format: `{framework_slug}/{supplier_id}/{category}/{supplier_id}-{document_name}`.
//! Uploads go to a timestamped variant of the same key so repeat uploads
//! never clobber earlier documents.

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M";

/// Canonical key for a supplier document under a framework.
pub fn document_path(
    framework_slug: &str,
    supplier_id: i64,
    category: &str,
    document_name: &str,
) -> String {
    format!(
        "{}/{}/{}/{}-{}",
        framework_slug, supplier_id, category, supplier_id, document_name
    )
}

/// Key for a fresh upload: the canonical key with an upload timestamp
/// inserted before the extension.
pub fn timestamped_document_path(
    framework_slug: &str,
    supplier_id: i64,
    category: &str,
    document_name: &str,
    now: DateTime<Utc>,
) -> String {
    let path = document_path(framework_slug, supplier_id, category, document_name);
    let timestamp = now.format(TIMESTAMP_FORMAT);
    match path.rsplit_once('.') {
        Some((stem, extension)) => format!("{}-{}.{}", stem, timestamp, extension),
        None => format!("{}-{}", path, timestamp),
    }
}

/// Recover the document name from a stored key: the basename with the
/// `{supplier_id}-` prefix stripped.
pub fn document_name_from_path(path: &str) -> String {
    let basename = path.rsplit('/').next().unwrap_or(path);
    match basename.split_once('-') {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) => {
            rest.to_string()
        }
        _ => basename.to_string(),
    }
}

/// Filename offered to the browser when downloading a supplier document.
pub fn download_filename(supplier_name: &str, supplier_id: i64, document_name: &str) -> String {
    format!("{}-{}-{}", slugify(supplier_name), supplier_id, document_name)
}

/// File extension of a key, lowercased and without the dot.
pub fn extension(path: &str) -> Option<String> {
    let basename = path.rsplit('/').next().unwrap_or(path);
    basename
        .rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext.to_lowercase())
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_path_layout() {
        assert_eq!(
            document_path("g-cloud-12", 93495, "agreements", "signed-framework-agreement.pdf"),
            "g-cloud-12/93495/agreements/93495-signed-framework-agreement.pdf"
        );
    }

    #[test]
    fn test_timestamped_path_keeps_extension_last() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 22).unwrap();
        assert_eq!(
            timestamped_document_path(
                "g-cloud-12",
                93495,
                "agreements",
                "agreement-countersignature.pdf",
                now
            ),
            "g-cloud-12/93495/agreements/93495-agreement-countersignature-2024-03-05-1430.pdf"
        );
    }

    #[test]
    fn test_document_name_strips_supplier_prefix() {
        assert_eq!(
            document_name_from_path(
                "g-cloud-12/93495/agreements/93495-signed-framework-agreement.pdf"
            ),
            "signed-framework-agreement.pdf"
        );
        // Basenames without a numeric prefix come back unchanged.
        assert_eq!(document_name_from_path("misc/terms.pdf"), "terms.pdf");
    }

    #[test]
    fn test_download_filename_slugifies_supplier_name() {
        assert_eq!(
            download_filename("Acme Widgets (UK) Ltd.", 93495, "agreement-countersignature.pdf"),
            "acme-widgets-uk-ltd-93495-agreement-countersignature.pdf"
        );
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a/b/c-file.PDF"), Some("pdf".to_string()));
        assert_eq!(extension("a/b/noextension"), None);
    }
}
