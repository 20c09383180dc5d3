use serde::Serialize;

use crate::services::auth::IssuedTokenPair;

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
    /// Usually "Bearer"
    pub token_type: String,
    /// Seconds until the auth token expires.
    pub expires_in: u64,

    /// Echoed back on refresh; newly minted on issue.
    pub refresh_token: String,
}

impl From<IssuedTokenPair> for TokenResponse {
    fn from(pair: IssuedTokenPair) -> Self {
        Self {
            auth_token: pair.auth_token,
            token_type: pair.token_type.to_string(),
            expires_in: pair.expires_in,
            refresh_token: pair.refresh_token,
        }
    }
}
