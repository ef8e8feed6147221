//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api/v0";

/// Path the OpenAPI document is served from
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Server-level cap on in-flight requests
pub const HTTP_CONCURRENCY_LIMIT: usize = 1_024;
