//! Configuration module
//!
//! Runtime configuration for the intake service and the project store. Values come from the
//! environment (a `.env` file is loaded first when present); everything has a default except
//! what must be explicit in production.

use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_IMAGE_SIZE_BYTES;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_STORAGE_PATH: &str = "./storage";
const UPLOAD_TEMP_DIR_NAME: &str = "projmeta-uploads";
const MIN_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Root of the key-addressed project tree.
    pub storage_path: PathBuf,
    /// Directory uploads are staged in before being committed or discarded.
    pub upload_temp_dir: PathBuf,
    /// Origin used to build public URLs, without trailing slash.
    pub public_base_url: String,
    pub max_image_size_bytes: usize,
    pub max_request_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_path = lookup("STORAGE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH));

        let upload_temp_dir = lookup("UPLOAD_TEMP_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(UPLOAD_TEMP_DIR_NAME));

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let max_image_size_bytes = match lookup("MAX_IMAGE_SIZE_BYTES") {
            Some(size) => size
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_IMAGE_SIZE_BYTES must be a valid number"))?,
            None => DEFAULT_MAX_IMAGE_SIZE_BYTES,
        };

        let max_request_body_bytes = match lookup("MAX_REQUEST_BODY_BYTES") {
            Some(size) => size
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_REQUEST_BODY_BYTES must be a valid number"))?,
            None => default_request_body_limit(max_image_size_bytes),
        };

        let config = Config {
            server_port,
            environment,
            cors_origins,
            storage_path,
            upload_temp_dir,
            public_base_url,
            max_image_size_bytes,
            max_request_body_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_BYTES must be greater than zero"));
        }

        if self.max_request_body_bytes <= self.max_image_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_BYTES must be larger than MAX_IMAGE_SIZE_BYTES"
            ));
        }

        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://"
            ));
        }

        if self.upload_temp_dir == self.storage_path {
            return Err(anyhow::anyhow!(
                "UPLOAD_TEMP_DIR must differ from STORAGE_PATH"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    /// Base URL the storage tree is published under, e.g. `http://localhost:4000/storage`.
    pub fn storage_base_url(&self) -> String {
        format!(
            "{}{}",
            self.public_base_url,
            crate::constants::STORAGE_URL_PATH
        )
    }
}

fn default_request_body_limit(max_image_size_bytes: usize) -> usize {
    max_image_size_bytes
        .saturating_mul(2)
        .max(MIN_REQUEST_BODY_BYTES)
}
