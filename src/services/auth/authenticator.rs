use axum::http::{HeaderMap, Request};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::services::auth::claims::{Claims, TokenKind};
use crate::services::auth::config::AuthConfig;
use crate::services::auth::extract::{Carrier, NamedToken, TokenSource};
use crate::services::auth::jwt::JwtVerifier;

/// Verified identity handed to downstream handlers via request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub principal: String,
    pub token_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True when the presented auth token had expired and was replaced.
    pub refreshed: bool,
}

impl AuthCtx {
    fn from_claims(claims: Claims, refreshed: bool) -> Self {
        Self {
            principal: claims.principal,
            token_id: claims.id,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
            refreshed,
        }
    }
}

/// A replacement auth token and where it has to be written.
#[derive(Debug, Clone)]
pub struct RefreshedToken {
    pub token: String,
    pub carrier: Carrier,
    max_age_secs: u64,
}

impl RefreshedToken {
    pub fn apply(&self, headers: &mut HeaderMap) {
        self.carrier.write(headers, &self.token, self.max_age_secs);
    }
}

#[derive(Debug, Clone)]
pub struct Authenticated {
    pub ctx: AuthCtx,
    pub refreshed: Option<RefreshedToken>,
}

/// Request-time token verifier.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct Authenticator {
    config: AuthConfig,
    verifier: JwtVerifier,
    source: TokenSource,
    refresh_source: NamedToken,
}

impl Authenticator {
    /// Validate `config` and resolve the signing method and extraction strategy once.
    pub fn create(config: AuthConfig) -> AuthResult<Self> {
        let method = config.signing_method()?;
        if config.signing_key.is_empty() {
            return Err(AuthError::EmptySigningKey);
        }

        let source = TokenSource::from_config(&config)?;
        let refresh_source = NamedToken::new(config.effective_refresh_token_name())?;
        let verifier = JwtVerifier::new(method, &config.signing_key);

        debug!(
            signing_method = %method,
            bearer_tokens = config.bearer_tokens,
            auth_token_name = config.effective_auth_token_name(),
            refresh_token_name = refresh_source.name(),
            "authenticator ready"
        );

        Ok(Self {
            config,
            verifier,
            source,
            refresh_source,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate `request`, attaching the verified [`AuthCtx`] to its extensions.
    ///
    /// A refreshed auth token, if one was minted, is written to `response`.
    pub fn handle_request<B>(
        &self,
        response: &mut HeaderMap,
        request: &mut Request<B>,
    ) -> AuthResult<AuthCtx> {
        let authenticated = self.authenticate(request.headers())?;

        if let Some(refreshed) = &authenticated.refreshed {
            refreshed.apply(response);
        }

        request.extensions_mut().insert(authenticated.ctx.clone());
        Ok(authenticated.ctx)
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult<Authenticated> {
        self.authenticate_at(headers, Utc::now())
    }

    fn authenticate_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> AuthResult<Authenticated> {
        let extracted = self.source.extract(headers).ok_or_else(|| {
            debug!("no auth token on request");
            AuthError::EmptyToken
        })?;

        let claims = self.verifier.verify(&extracted.token)?;
        if claims.kind != TokenKind::Auth {
            debug!(token_id = %claims.id, "refresh token presented as auth token");
            return Err(AuthError::WrongTokenKind);
        }

        if !claims.is_expired_at(now) {
            debug!(principal = %claims.principal, carrier = ?extracted.carrier, "auth token accepted");
            return Ok(Authenticated {
                ctx: AuthCtx::from_claims(claims, false),
                refreshed: None,
            });
        }

        debug!(
            principal = %claims.principal,
            expired_at = %claims.expires_at,
            "auth token expired, trying refresh token"
        );

        let Some(refresh_claims) = self.valid_refresh_claims(headers, &claims.principal, now)
        else {
            return Err(AuthError::TokenExpired);
        };

        let valid_time = self.config.effective_auth_token_valid_time();
        let token = self
            .config
            .issue_new_token(&refresh_claims.principal, valid_time)?;
        let fresh = self.verifier.verify(&token)?;

        debug!(principal = %fresh.principal, token_id = %fresh.id, "auth token refreshed");

        Ok(Authenticated {
            ctx: AuthCtx::from_claims(fresh, true),
            refreshed: Some(RefreshedToken {
                token,
                carrier: extracted.carrier,
                max_age_secs: valid_time.as_secs(),
            }),
        })
    }

    fn valid_refresh_claims(
        &self,
        headers: &HeaderMap,
        principal: &str,
        now: DateTime<Utc>,
    ) -> Option<Claims> {
        let extracted = self.refresh_source.extract(headers)?;

        let claims = match self.verify_refresh(&extracted.token, now) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "refresh token rejected");
                return None;
            }
        };

        if claims.principal != principal {
            debug!(token_id = %claims.id, "refresh token principal does not match auth token");
            return None;
        }

        Some(claims)
    }

    fn verify_refresh(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let claims = self.verifier.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongTokenKind);
        }
        if claims.is_expired_at(now) {
            return Err(AuthError::RefreshTokenExpired);
        }
        Ok(claims)
    }

    /// Exchange a refresh token for a new auth token (explicit refresh grant).
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.verify_refresh(refresh_token, Utc::now())?;
        self.config
            .issue_new_token(&claims.principal, self.config.effective_auth_token_valid_time())
    }
}
