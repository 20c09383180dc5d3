use serde::Deserialize;

/// Request body for `/token`.
///
/// We keep a single endpoint and branch by `grant_type`.
///
/// - Issue (default): omit `grant_type` and provide `username`.
/// - Refresh: set `grant_type` to `"refresh_token"` and provide `refresh_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub username: Option<String>,
    pub refresh_token: Option<String>,
}
