use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Which half of the token pair a token is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Tokens without a `kind` claim are treated as auth tokens.
    #[default]
    Auth,
    Refresh,
}

/// Signed token payload.
///
/// Wire shape: `{"id", "username", "issuedAt", "expiresAt", "kind"}` with RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: Uuid,
    #[serde(rename = "username")]
    pub principal: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: TokenKind,
}

impl Claims {
    /// Callers must have validated `principal` and `valid_for` (non-empty / non-zero).
    ///
    /// Fails when `issued_at + valid_for` falls outside the representable date range.
    pub(crate) fn new(
        principal: &str,
        issued_at: DateTime<Utc>,
        valid_for: chrono::Duration,
        kind: TokenKind,
    ) -> AuthResult<Self> {
        let expires_at = issued_at
            .checked_add_signed(valid_for)
            .ok_or(AuthError::DurationOutOfRange)?;

        Ok(Self {
            id: Uuid::now_v7(),
            principal: principal.to_string(),
            issued_at,
            expires_at,
            kind,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
