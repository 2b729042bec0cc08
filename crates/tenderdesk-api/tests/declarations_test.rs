//! Declaration viewing and section editing integration tests.
//!
//! Run with: `cargo test -p tenderdesk-api --test declarations_test`

mod helpers;

use helpers::fixtures;
use helpers::{api_path, setup_test_app, token_for};
use serde_json::json;
use tenderdesk_api::auth::AdminRole;
use tenderdesk_core::models::FrameworkStatus;

#[tokio::test]
async fn test_declaration_cannot_be_edited_on_open_framework() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        13,
        "g-cloud-13",
        "G-Cloud 13",
        FrameworkStatus::Open,
    ));
    app.write_manifest("g-cloud-13", "declaration", &fixtures::declaration_manifest());

    let response = app
        .client()
        .post(&api_path(
            "/suppliers/1/frameworks/g-cloud-13/declaration/sections/organisation",
        ))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::Sourcing)),
        )
        .json(&json!({ "nameOfOrganisation": "Acme Ltd" }))
        .await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(app.api.declaration_writes(), 0);
}

#[tokio::test]
async fn test_unchanged_section_post_issues_no_write() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        12,
        "g-cloud-12",
        "G-Cloud 12",
        FrameworkStatus::Live,
    ));
    app.write_manifest("g-cloud-12", "declaration", &fixtures::declaration_manifest());

    let mut declaration = tenderdesk_core::models::Declaration::new();
    declaration.insert("nameOfOrganisation".to_string(), json!("Acme Ltd"));
    declaration.insert("tradingStatus".to_string(), json!("limited company"));
    app.api.set_declaration(1, "g-cloud-12", declaration);

    let response = app
        .client()
        .post(&api_path(
            "/suppliers/1/frameworks/g-cloud-12/declaration/sections/organisation",
        ))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::Sourcing)),
        )
        .json(&json!({
            "nameOfOrganisation": "Acme Ltd",
            "tradingStatus": "limited company"
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["changed"], false);
    assert_eq!(app.api.declaration_writes(), 0);
}

#[tokio::test]
async fn test_changed_section_post_persists_whole_declaration() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        12,
        "g-cloud-12",
        "G-Cloud 12",
        FrameworkStatus::Live,
    ));
    app.write_manifest("g-cloud-12", "declaration", &fixtures::declaration_manifest());

    let mut declaration = tenderdesk_core::models::Declaration::new();
    declaration.insert("nameOfOrganisation".to_string(), json!("Acme Ltd"));
    declaration.insert("misleadingInformation".to_string(), json!(false));
    app.api.set_declaration(1, "g-cloud-12", declaration);

    let response = app
        .client()
        .post(&api_path(
            "/suppliers/1/frameworks/g-cloud-12/declaration/sections/organisation",
        ))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::Sourcing)),
        )
        .json(&json!({
            "nameOfOrganisation": "Acme Holdings Ltd",
            "tradingStatus": "llp",
            "unrelatedField": "dropped"
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["changed"], true);
    // Answers outside the section are dropped; answers from other sections
    // survive the merge.
    assert_eq!(body["declaration"]["nameOfOrganisation"], "Acme Holdings Ltd");
    assert_eq!(body["declaration"]["tradingStatus"], "llp");
    assert_eq!(body["declaration"]["misleadingInformation"], false);
    assert!(body["declaration"].get("unrelatedField").is_none());
    assert_eq!(app.api.declaration_writes(), 1);
}

#[tokio::test]
async fn test_unknown_section_is_not_found() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        12,
        "g-cloud-12",
        "G-Cloud 12",
        FrameworkStatus::Live,
    ));
    app.write_manifest("g-cloud-12", "declaration", &fixtures::declaration_manifest());

    let response = app
        .client()
        .get(&api_path(
            "/suppliers/1/frameworks/g-cloud-12/declaration/sections/nonexistent",
        ))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::Sourcing)),
        )
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_missing_declaration_is_viewed_as_empty() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        12,
        "g-cloud-12",
        "G-Cloud 12",
        FrameworkStatus::Live,
    ));
    app.write_manifest("g-cloud-12", "declaration", &fixtures::declaration_manifest());

    let response = app
        .client()
        .get(&api_path("/suppliers/1/frameworks/g-cloud-12/declaration"))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::Sourcing)),
        )
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["declaration"], json!({}));
    assert_eq!(body["frameworkName"], "G-Cloud 12");
}

#[tokio::test]
async fn test_modern_slavery_paths_are_rewritten_to_asset_urls() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        12,
        "g-cloud-12",
        "G-Cloud 12",
        FrameworkStatus::Live,
    ));
    app.write_manifest("g-cloud-12", "declaration", &fixtures::declaration_manifest());

    let mut declaration = tenderdesk_core::models::Declaration::new();
    declaration.insert(
        "modernSlaveryStatement".to_string(),
        json!("g-cloud-12/1/documents/modern-slavery-statement.pdf"),
    );
    declaration.insert(
        "modernSlaveryStatementOptional".to_string(),
        json!("https://example.com/already-a-url.pdf"),
    );
    app.api.set_declaration(1, "g-cloud-12", declaration);

    let response = app
        .client()
        .get(&api_path("/suppliers/1/frameworks/g-cloud-12/declaration"))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::Sourcing)),
        )
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["declaration"]["modernSlaveryStatement"],
        "https://assets.example.com/g-cloud-12/1/documents/modern-slavery-statement.pdf"
    );
    // Absolute URLs are left alone.
    assert_eq!(
        body["declaration"]["modernSlaveryStatementOptional"],
        "https://example.com/already-a-url.pdf"
    );
    // The stored declaration keeps the raw path.
    assert_eq!(app.api.declaration_writes(), 0);
}

#[tokio::test]
async fn test_declaration_routes_reject_non_sourcing_roles() {
    let app = setup_test_app();
    app.api.add_framework(fixtures::framework(
        12,
        "g-cloud-12",
        "G-Cloud 12",
        FrameworkStatus::Live,
    ));

    let response = app
        .client()
        .get(&api_path("/suppliers/1/frameworks/g-cloud-12/declaration"))
        .add_header(
            "Authorization",
            format!("Bearer {}", token_for(AdminRole::CategoryManager)),
        )
        .await;

    assert_eq!(response.status_code(), 403);
}
