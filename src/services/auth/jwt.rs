use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};

use crate::error::{AuthError, AuthResult};
use crate::services::auth::claims::Claims;
use crate::services::auth::config::SigningMethod;

/// HMAC signer for token claims.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtSigner {
    method: SigningMethod,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("method", &self.method)
            .finish()
    }
}

impl JwtSigner {
    pub fn new(method: SigningMethod, signing_key: &str) -> Self {
        Self {
            method,
            encoding_key: EncodingKey::from_secret(signing_key.as_bytes()),
        }
    }

    pub fn method(&self) -> SigningMethod {
        self.method
    }

    pub fn sign(&self, claims: &Claims) -> AuthResult<String> {
        let mut header = Header::new(self.method.algorithm());
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AuthError::Signing
        })
    }
}

/// HMAC verifier for token claims.
///
/// Expiry is not checked here: `expiresAt` is an RFC 3339 claim, and an expired
/// token still has to be decoded so the authenticator can decide on a refresh.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(method: SigningMethod, signing_key: &str) -> Self {
        let mut validation = Validation::new(method.algorithm());
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        Self {
            decoding_key: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
        }
    }

    /// Verify the signature and algorithm, then decode the claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token verification failed");
                if matches!(e.kind(), ErrorKind::Base64(_)) && only_signature_undecodable(token) {
                    return AuthError::InvalidSignature;
                }
                AuthError::from(e)
            })?;

        Ok(data.claims)
    }
}

/// Header and payload are valid base64url but the signature segment is not,
/// e.g. an edited last character leaving non-zero trailing bits.
fn only_signature_undecodable(token: &str) -> bool {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return false;
    };

    URL_SAFE_NO_PAD.decode(header).is_ok()
        && URL_SAFE_NO_PAD.decode(payload).is_ok()
        && URL_SAFE_NO_PAD.decode(signature).is_err()
}
