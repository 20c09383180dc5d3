use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::error::{AuthError, AuthResult};

/// Header read in bearer mode.
pub const DEFAULT_BEARER_AUTH_TOKEN_HEADER: &str = "Authorization";
pub const DEFAULT_AUTH_TOKEN_NAME: &str = "X-Auth-Token";
pub const DEFAULT_REFRESH_TOKEN_NAME: &str = "X-Refresh-Token";

pub const DEFAULT_AUTH_TOKEN_VALID_TIME: Duration = Duration::from_secs(600); // 10 min
pub const DEFAULT_REFRESH_TOKEN_VALID_TIME: Duration = Duration::from_secs(2_592_000); // 30 days

/// Supported signing algorithms. The signing key is shared secret text, so only HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMethod {
    Hs256,
    Hs384,
    Hs512,
}

impl SigningMethod {
    pub fn algorithm(self) -> Algorithm {
        match self {
            SigningMethod::Hs256 => Algorithm::HS256,
            SigningMethod::Hs384 => Algorithm::HS384,
            SigningMethod::Hs512 => Algorithm::HS512,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SigningMethod::Hs256 => "HS256",
            SigningMethod::Hs384 => "HS384",
            SigningMethod::Hs512 => "HS512",
        }
    }
}

impl FromStr for SigningMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(SigningMethod::Hs256),
            "HS384" => Ok(SigningMethod::Hs384),
            "HS512" => Ok(SigningMethod::Hs512),
            _ => Err(AuthError::UnsupportedSigningMethod),
        }
    }
}

impl fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signing parameters shared read-only by the issuer and the authenticator.
///
/// - Zero durations select the built-in defaults (they never mean "no expiry").
/// - Empty token names select the built-in default names.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub signing_key: String,
    pub signing_method: String,
    pub bearer_tokens: bool,
    pub auth_token_valid_time: Duration,
    pub refresh_token_valid_time: Duration,
    pub auth_token_name: String,
    pub refresh_token_name: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthConfig")
            .field("signing_method", &self.signing_method)
            .field("bearer_tokens", &self.bearer_tokens)
            .field("auth_token_valid_time", &self.auth_token_valid_time)
            .field("refresh_token_valid_time", &self.refresh_token_valid_time)
            .field("auth_token_name", &self.auth_token_name)
            .field("refresh_token_name", &self.refresh_token_name)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(signing_key: impl Into<String>, signing_method: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            signing_method: signing_method.into(),
            ..Self::default()
        }
    }

    pub fn with_bearer_tokens(mut self, bearer_tokens: bool) -> Self {
        self.bearer_tokens = bearer_tokens;
        self
    }

    pub fn with_auth_token_valid_time(mut self, valid_time: Duration) -> Self {
        self.auth_token_valid_time = valid_time;
        self
    }

    pub fn with_refresh_token_valid_time(mut self, valid_time: Duration) -> Self {
        self.refresh_token_valid_time = valid_time;
        self
    }

    pub fn with_auth_token_name(mut self, name: impl Into<String>) -> Self {
        self.auth_token_name = name.into();
        self
    }

    pub fn with_refresh_token_name(mut self, name: impl Into<String>) -> Self {
        self.refresh_token_name = name.into();
        self
    }

    pub fn signing_method(&self) -> AuthResult<SigningMethod> {
        self.signing_method.parse()
    }

    pub fn effective_auth_token_valid_time(&self) -> Duration {
        or_default_duration(self.auth_token_valid_time, DEFAULT_AUTH_TOKEN_VALID_TIME)
    }

    pub fn effective_refresh_token_valid_time(&self) -> Duration {
        or_default_duration(
            self.refresh_token_valid_time,
            DEFAULT_REFRESH_TOKEN_VALID_TIME,
        )
    }

    pub fn effective_auth_token_name(&self) -> &str {
        or_default_name(&self.auth_token_name, DEFAULT_AUTH_TOKEN_NAME)
    }

    pub fn effective_refresh_token_name(&self) -> &str {
        or_default_name(&self.refresh_token_name, DEFAULT_REFRESH_TOKEN_NAME)
    }
}

fn or_default_duration(value: Duration, default: Duration) -> Duration {
    if value.is_zero() { default } else { value }
}

fn or_default_name<'a>(value: &'a str, default: &'static str) -> &'a str {
    if value.is_empty() { default } else { value }
}
