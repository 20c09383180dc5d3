/*
 * Responsibility
 * - Error taxonomy for issuance (406) and request-time authentication (403)
 * - IntoResponse implementation (HTTP status / JSON error body)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Every variant carries exactly one fixed message; `code()` is the HTTP-style status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("signing method not supported")]
    UnsupportedSigningMethod,
    #[error("username is required to generate payload")]
    MissingPrincipal,
    #[error("duration cannot be 0")]
    ZeroDuration,
    #[error("duration is out of range")]
    DurationOutOfRange,
    #[error("signingKey cannot be empty")]
    EmptySigningKey,
    #[error("token name is not a valid header name")]
    InvalidTokenName,
    #[error("failed to sign token")]
    Signing,

    #[error("empty auth token")]
    EmptyToken,
    #[error("malformed auth token")]
    MalformedToken,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("signing method mismatch")]
    AlgorithmMismatch,
    #[error("auth token expired")]
    TokenExpired,
    #[error("refresh token expired")]
    RefreshTokenExpired,
    #[error("token kind not accepted")]
    WrongTokenKind,
}

impl AuthError {
    pub fn code(&self) -> u16 {
        self.status().as_u16()
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::UnsupportedSigningMethod
            | AuthError::MissingPrincipal
            | AuthError::ZeroDuration
            | AuthError::DurationOutOfRange
            | AuthError::EmptySigningKey
            | AuthError::InvalidTokenName
            | AuthError::Signing => StatusCode::NOT_ACCEPTABLE,
            AuthError::EmptyToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::AlgorithmMismatch
            | AuthError::TokenExpired
            | AuthError::RefreshTokenExpired
            | AuthError::WrongTokenKind => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    fn error_code(&self) -> &'static str {
        match self.status() {
            StatusCode::FORBIDDEN => "FORBIDDEN",
            _ => "NOT_ACCEPTABLE",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => AuthError::AlgorithmMismatch,
            _ => AuthError::MalformedToken,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}
