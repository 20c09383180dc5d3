pub mod authenticator;
pub mod claims;
pub mod config;
pub mod extract;
pub mod jwt;
pub mod token_issuer;

pub use authenticator::{AuthCtx, Authenticated, Authenticator, RefreshedToken};
pub use claims::{Claims, TokenKind};
pub use config::{AuthConfig, SigningMethod};
pub use token_issuer::IssuedTokenPair;
