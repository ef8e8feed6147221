//! Test helpers: build the application over scratch directories.
//!
//! Run from workspace root: `cargo test -p projmeta-api --test projects_test`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use projmeta_api::constants;
use projmeta_core::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub const PUBLIC_BASE_URL: &str = "http://projects.test";

/// Test application: server plus the directories it owns.
pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    pub _storage_dir: TempDir,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_path(&self) -> &Path {
        &self.config.storage_path
    }

    pub fn project_dir(&self, chain_id: &str, token_address: &str) -> PathBuf {
        self.storage_path().join(chain_id).join(token_address)
    }

    /// Number of entries left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(&self.config.upload_temp_dir)
            .expect("Failed to read upload temp dir")
            .count()
    }
}

/// Setup test app with the default 3 MiB image limit.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with extra configuration variables.
pub async fn setup_test_app_with(vars: &[(&str, &str)]) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage directory");
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut env: HashMap<String, String> = HashMap::from([
        (
            "STORAGE_PATH".to_string(),
            storage_dir.path().display().to_string(),
        ),
        (
            "UPLOAD_TEMP_DIR".to_string(),
            temp_dir.path().display().to_string(),
        ),
        ("PUBLIC_BASE_URL".to_string(), PUBLIC_BASE_URL.to_string()),
    ]);
    for (key, value) in vars {
        env.insert(key.to_string(), value.to_string());
    }

    let config =
        Config::from_lookup(|key| env.get(key).cloned()).expect("Failed to build test config");

    let (_state, app) = projmeta_api::setup::initialize_app(config.clone())
        .await
        .expect("Failed to initialize app");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        config,
        _storage_dir: storage_dir,
        _temp_dir: temp_dir,
    }
}

/// Text fields of a complete submission for `(chain_id, token_address)`.
pub fn project_fields(chain_id: &str, token_address: &str) -> Vec<(&'static str, String)> {
    vec![
        ("projectName", "Foo".to_string()),
        ("projectDescription", "Bar".to_string()),
        ("chainID", chain_id.to_string()),
        ("tokenAddress", token_address.to_string()),
    ]
}

/// Build a multipart form from text fields and an optional image part.
pub fn project_form(fields: &[(&str, String)], image: Option<Part>) -> MultipartForm {
    let mut form = MultipartForm::new();
    for (name, value) in fields {
        form = form.add_text(name.to_string(), value.clone());
    }
    if let Some(part) = image {
        form = form.add_part("image", part);
    }
    form
}

pub fn png_part(data: Vec<u8>) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name("logo.png")
        .mime_type("image/png")
}
