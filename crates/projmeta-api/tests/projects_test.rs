//! Project submission integration tests.
//!
//! Run with: `cargo test -p projmeta-api --test projects_test`

mod helpers;

use axum_test::multipart::Part;
use helpers::fixtures::{create_minimal_png, create_png_of_size};
use helpers::{
    api_path, png_part, project_fields, project_form, setup_test_app, setup_test_app_with,
    PUBLIC_BASE_URL,
};
use std::future::IntoFuture;

#[tokio::test]
async fn test_new_project_is_created() {
    let app = setup_test_app().await;
    let form = project_form(
        &project_fields("1", "0xABC"),
        Some(png_part(create_png_of_size(10 * 1024))),
    );

    let response = app.client().post(&api_path("/projects")).multipart(form).await;

    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Project metadata stored successfully");
    assert_eq!(
        body["metadataUrl"],
        format!("{}/storage/1/0xABC/metadata.json", PUBLIC_BASE_URL)
    );
    assert!(body["imageUrl"]
        .as_str()
        .unwrap()
        .ends_with("/1/0xABC/project-image.png"));
    assert!(body.get("existing").is_none());

    let dir = app.project_dir("1", "0xABC");
    let stored = std::fs::read(dir.join("project-image.png")).unwrap();
    assert_eq!(stored.len(), 10 * 1024);

    let metadata: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("metadata.json")).unwrap()).unwrap();
    assert_eq!(metadata["chainID"], "1");
    assert_eq!(metadata["tokenAddress"], "0xABC");
    assert_eq!(metadata["projectName"], "Foo");
    assert_eq!(metadata["website"], "");
    assert_eq!(metadata["imageUrl"], body["imageUrl"]);
    assert_eq!(metadata["createdAt"], metadata["updatedAt"]);

    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_resubmission_returns_existing_project() {
    let app = setup_test_app().await;
    let fields = project_fields("1", "0xABC");

    let first = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&fields, Some(png_part(create_minimal_png()))))
        .await;
    assert_eq!(first.status_code(), 201);
    let first_body: serde_json::Value = first.json();
    let metadata_path = app.project_dir("1", "0xABC").join("metadata.json");
    let original = std::fs::read_to_string(&metadata_path).unwrap();

    let mut changed = fields.clone();
    changed[0].1 = "Renamed".to_string();
    let second = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&changed, Some(png_part(create_minimal_png()))))
        .await;

    assert_eq!(second.status_code(), 200);
    let body: serde_json::Value = second.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["existing"], true);
    assert_eq!(body["message"], "Project already exists");
    assert_eq!(body["metadataUrl"], first_body["metadataUrl"]);
    assert_eq!(body["imageUrl"], first_body["imageUrl"]);

    // stored record untouched, createdAt included
    assert_eq!(std::fs::read_to_string(&metadata_path).unwrap(), original);
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_existing_project_without_image() {
    let app = setup_test_app().await;
    let fields = project_fields("56", "0xdef");

    let first = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&fields, Some(png_part(create_minimal_png()))))
        .await;
    assert_eq!(first.status_code(), 201);

    let second = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&fields, None))
        .await;

    assert_eq!(second.status_code(), 200);
    let body: serde_json::Value = second.json();
    assert_eq!(body["existing"], true);
}

#[tokio::test]
async fn test_missing_field_is_named() {
    let app = setup_test_app().await;
    let mut fields = project_fields("1", "0xABC");
    fields.retain(|(name, _)| *name != "tokenAddress");

    let response = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&fields, Some(png_part(create_minimal_png()))))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "MISSING_FIELDS");
    assert!(body["error"].as_str().unwrap().contains("tokenAddress"));
    assert_eq!(body["missingFields"], serde_json::json!(["tokenAddress"]));
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_oversized_image_is_rejected() {
    let app = setup_test_app_with(&[("MAX_IMAGE_SIZE_BYTES", "3145728")]).await;
    let form = project_form(
        &project_fields("1", "0xBIG"),
        Some(png_part(create_png_of_size(5 * 1024 * 1024))),
    );

    let response = app.client().post(&api_path("/projects")).multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"].as_str().unwrap().contains("too large"));
    assert_eq!(body["maxSizeBytes"], 3145728);
    assert!(!app.project_dir("1", "0xBIG").exists());
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_unsupported_type_is_rejected() {
    let app = setup_test_app().await;
    let text = Part::bytes(bytes::Bytes::from_static(b"not an image"))
        .file_name("notes.txt")
        .mime_type("text/plain");
    let form = project_form(&project_fields("1", "0xTXT"), Some(text));

    let response = app.client().post(&api_path("/projects")).multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(body["acceptedTypes"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("image/gif")));
    assert!(!app.project_dir("1", "0xTXT").exists());
    assert!(!app.storage_path().join("1").exists());
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_new_project_requires_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&project_fields("1", "0xNOIMG"), None))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MISSING_IMAGE");
    assert!(!app.project_dir("1", "0xNOIMG").exists());
}

#[tokio::test]
async fn test_multiple_images_are_rejected() {
    let app = setup_test_app().await;
    let form = project_form(
        &project_fields("1", "0xTWO"),
        Some(png_part(create_minimal_png())),
    )
    .add_part("image", png_part(create_minimal_png()));

    let response = app.client().post(&api_path("/projects")).multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MULTIPLE_IMAGES");
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_path_traversal_key_is_rejected() {
    let app = setup_test_app().await;

    for (chain_id, token_address) in [("..", "0xabc"), ("1", "../../etc"), ("1", "a\\b")] {
        let response = app
            .client()
            .post(&api_path("/projects"))
            .multipart(project_form(
                &project_fields(chain_id, token_address),
                Some(png_part(create_minimal_png())),
            ))
            .await;

        assert_eq!(response.status_code(), 400, "key {chain_id}/{token_address}");
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_KEY");
    }

    let parent = app.storage_path().parent().unwrap();
    assert!(!parent.join("0xabc").exists());
    assert_eq!(std::fs::read_dir(app.storage_path()).unwrap().count(), 0);
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_optional_fields_round_trip() {
    let app = setup_test_app().await;
    let mut fields = project_fields("137", "0xSocial");
    fields.push(("website", "https://example.com".to_string()));
    fields.push(("twitter", "@example".to_string()));
    fields.push(("discord", "example#1234".to_string()));

    let response = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(&fields, Some(png_part(create_minimal_png()))))
        .await;
    assert_eq!(response.status_code(), 201);

    let metadata: serde_json::Value = serde_json::from_slice(
        &std::fs::read(app.project_dir("137", "0xSocial").join("metadata.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metadata["website"], "https://example.com");
    assert_eq!(metadata["twitter"], "@example");
    assert_eq!(metadata["telegram"], "");
    assert_eq!(metadata["discord"], "example#1234");
}

#[tokio::test]
async fn test_concurrent_first_submissions_create_once() {
    let app = setup_test_app().await;
    let fields = project_fields("1", "0xRACE");

    let requests = (0..6).map(|_| {
        app.client()
            .post(&api_path("/projects"))
            .multipart(project_form(&fields, Some(png_part(create_minimal_png()))))
            .into_future()
    });
    let responses = futures::future::join_all(requests).await;

    let created = responses.iter().filter(|r| r.status_code() == 201).count();
    let existing = responses.iter().filter(|r| r.status_code() == 200).count();
    assert_eq!(created, 1);
    assert_eq!(existing, 5);

    let images = std::fs::read_dir(app.project_dir("1", "0xRACE"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("project-image"))
        .count();
    assert_eq!(images, 1);
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_stored_files_are_served() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(
            &project_fields("1", "0xServe"),
            Some(png_part(create_minimal_png())),
        ))
        .await;
    assert_eq!(response.status_code(), 201);

    let metadata = app.client().get("/storage/1/0xServe/metadata.json").await;
    assert_eq!(metadata.status_code(), 200);
    assert_eq!(metadata.header("content-type"), "application/json");
    let body: serde_json::Value = metadata.json();
    assert_eq!(body["tokenAddress"], "0xServe");

    let image = app.client().get("/storage/1/0xServe/project-image.png").await;
    assert_eq!(image.status_code(), 200);
    assert_eq!(image.as_bytes().as_ref(), create_minimal_png().as_slice());

    let hidden = app.client().get("/storage/1/0xServe/.metadata.json.tmp").await;
    assert_eq!(hidden.status_code(), 404);
}

#[tokio::test]
async fn test_dot_prefixed_key_is_served() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(
            &project_fields("1", ".eth"),
            Some(png_part(create_minimal_png())),
        ))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["metadataUrl"],
        format!("{}/storage/1/.eth/metadata.json", PUBLIC_BASE_URL)
    );

    let metadata = app.client().get("/storage/1/.eth/metadata.json").await;
    assert_eq!(metadata.status_code(), 200);
    assert_eq!(metadata.header("content-type"), "application/json");

    let image = app.client().get("/storage/1/.eth/project-image.png").await;
    assert_eq!(image.status_code(), 200);

    // leftover write files stay hidden, encoded or not
    std::fs::write(app.project_dir("1", ".eth").join(".metadata.json.tmp"), b"{}").unwrap();
    for path in [
        "/storage/1/.eth/.metadata.json.tmp",
        "/storage/1/.eth/%2Emetadata.json.tmp",
        "/storage/1/.eth%2F.metadata.json.tmp",
    ] {
        let hidden = app.client().get(path).await;
        assert_eq!(hidden.status_code(), 404, "{path}");
    }
}

#[tokio::test]
async fn test_storage_failure_removes_staged_upload() {
    let app = setup_test_app().await;
    // chain directory cannot be created over a regular file
    std::fs::write(app.storage_path().join("1"), b"not a directory").unwrap();

    let response = app
        .client()
        .post(&api_path("/projects"))
        .multipart(project_form(
            &project_fields("1", "0xFAIL"),
            Some(png_part(create_minimal_png())),
        ))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to store project metadata");
    assert_eq!(body["code"], "STORAGE_WRITE_FAILED");
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let live = app.client().get("/health").await;
    assert_eq!(live.status_code(), 200);

    let ready = app.client().get("/health/ready").await;
    assert_eq!(ready.status_code(), 200);
    let body: serde_json::Value = ready.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/v0/projects"]["post"].is_object());
}
