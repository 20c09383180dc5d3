use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::services::auth::claims::{Claims, TokenKind};
use crate::services::auth::config::{AuthConfig, SigningMethod};
use crate::services::auth::jwt::JwtSigner;

/// Auth token + refresh token minted together for one principal.
#[derive(Clone, Debug)]
pub struct IssuedTokenPair {
    pub auth_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Seconds until the auth token expires.
    pub expires_in: u64,
}

impl AuthConfig {
    /// Issue an auth token for `principal`, valid for `duration`.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// signing method, principal, duration, signing key.
    pub fn issue_new_token(&self, principal: &str, duration: Duration) -> AuthResult<String> {
        self.issue_new_token_at(principal, duration, Utc::now())
    }

    /// Same as [`AuthConfig::issue_new_token`] with an explicit issuance instant.
    pub fn issue_new_token_at(
        &self,
        principal: &str,
        duration: Duration,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        self.issue(principal, duration, issued_at, TokenKind::Auth)
    }

    /// Issue a refresh token valid for the configured refresh window.
    pub fn issue_refresh_token(&self, principal: &str) -> AuthResult<String> {
        self.issue(
            principal,
            self.effective_refresh_token_valid_time(),
            Utc::now(),
            TokenKind::Refresh,
        )
    }

    pub fn issue_token_pair(&self, principal: &str) -> AuthResult<IssuedTokenPair> {
        let auth_valid_time = self.effective_auth_token_valid_time();
        let auth_token = self.issue_new_token(principal, auth_valid_time)?;
        let refresh_token = self.issue_refresh_token(principal)?;

        Ok(IssuedTokenPair {
            auth_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: auth_valid_time.as_secs(),
        })
    }

    pub(crate) fn issue(
        &self,
        principal: &str,
        duration: Duration,
        issued_at: DateTime<Utc>,
        kind: TokenKind,
    ) -> AuthResult<String> {
        let method = self.validate_issuance(principal, duration)?;
        let valid_for =
            chrono::Duration::from_std(duration).map_err(|_| AuthError::DurationOutOfRange)?;

        let claims = Claims::new(principal, issued_at, valid_for, kind)?;

        debug!(
            principal = %claims.principal,
            token_id = %claims.id,
            kind = ?kind,
            expires_at = %claims.expires_at,
            "issuing token"
        );

        JwtSigner::new(method, &self.signing_key).sign(&claims)
    }

    fn validate_issuance(&self, principal: &str, duration: Duration) -> AuthResult<SigningMethod> {
        let method = self.signing_method()?;
        if principal.is_empty() {
            return Err(AuthError::MissingPrincipal);
        }
        if duration.is_zero() {
            return Err(AuthError::ZeroDuration);
        }
        if self.signing_key.is_empty() {
            return Err(AuthError::EmptySigningKey);
        }
        Ok(method)
    }
}
