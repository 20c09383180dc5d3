//! Stateless token authentication.
//!
//! - [`AuthConfig`] holds signing parameters and issues tokens.
//! - [`Authenticator`] extracts, verifies and (when a refresh token allows it)
//!   replaces auth tokens on inbound requests.
//! - [`middleware::auth::access`] wires the authenticator into an axum router.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use error::{AuthError, AuthResult};
pub use services::auth::{
    AuthConfig, AuthCtx, Authenticated, Authenticator, Claims, IssuedTokenPair, RefreshedToken,
    SigningMethod, TokenKind,
};
