//! Token extraction strategies.
//!
//! The strategy is chosen once when the authenticator is built; each request
//! goes through a single `TokenSource::extract` call.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

use crate::error::{AuthError, AuthResult};
use crate::services::auth::config::{AuthConfig, DEFAULT_BEARER_AUTH_TOKEN_HEADER};

/// Where a token was found, and therefore where a replacement is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Carrier {
    Bearer,
    Header(HeaderName),
    Cookie(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub token: String,
    pub carrier: Carrier,
}

/// A token carried under one name, as a header first and a cookie second.
#[derive(Debug, Clone)]
pub struct NamedToken {
    header: HeaderName,
    cookie: String,
}

impl NamedToken {
    pub fn new(name: &str) -> AuthResult<Self> {
        let header =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| AuthError::InvalidTokenName)?;
        Ok(Self {
            header,
            cookie: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.cookie
    }

    pub fn extract(&self, headers: &HeaderMap) -> Option<Extracted> {
        if let Some(token) = headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return Some(Extracted {
                token: token.to_string(),
                carrier: Carrier::Header(self.header.clone()),
            });
        }

        cookie_value(headers, &self.cookie).map(|token| Extracted {
            token,
            carrier: Carrier::Cookie(self.cookie.clone()),
        })
    }
}

#[derive(Debug, Clone)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>`, then an optional custom name.
    Bearer { fallback: Option<NamedToken> },
    Named(NamedToken),
}

impl TokenSource {
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let named = NamedToken::new(config.effective_auth_token_name())?;

        if !config.bearer_tokens {
            return Ok(TokenSource::Named(named));
        }

        // Bearer header wins; a custom name is only consulted when it is a different header.
        let fallback = (!config.auth_token_name.is_empty()
            && !config
                .auth_token_name
                .eq_ignore_ascii_case(DEFAULT_BEARER_AUTH_TOKEN_HEADER))
        .then_some(named);

        Ok(TokenSource::Bearer { fallback })
    }

    pub fn extract(&self, headers: &HeaderMap) -> Option<Extracted> {
        match self {
            TokenSource::Bearer { fallback } => bearer_token(headers)
                .map(|token| Extracted {
                    token,
                    carrier: Carrier::Bearer,
                })
                .or_else(|| fallback.as_ref().and_then(|named| named.extract(headers))),
            TokenSource::Named(named) => named.extract(headers),
        }
    }
}

impl Carrier {
    /// Write `token` back on a response using the same carrier convention.
    pub fn write(&self, headers: &mut HeaderMap, token: &str, max_age_secs: u64) {
        let value = match self {
            Carrier::Bearer => HeaderValue::from_str(&format!("Bearer {token}")),
            Carrier::Header(_) => HeaderValue::from_str(token),
            Carrier::Cookie(name) => HeaderValue::from_str(&format!(
                "{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
            )),
        };

        // Tokens are base64url segments, so they always form a valid header value.
        let Ok(value) = value else {
            tracing::warn!("refreshed token is not a valid header value");
            return;
        };

        match self {
            Carrier::Bearer => {
                headers.insert(header::AUTHORIZATION, value);
            }
            Carrier::Header(name) => {
                headers.insert(name.clone(), value);
            }
            Carrier::Cookie(_) => {
                headers.append(header::SET_COOKIE, value);
            }
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(name, value) in pairs {
            map.append(name, HeaderValue::from_static(value));
        }
        map
    }

    fn bearer_config() -> AuthConfig {
        AuthConfig::new("k", "HS256").with_bearer_tokens(true)
    }

    #[test]
    fn bearer_strips_scheme() {
        let source = TokenSource::from_config(&bearer_config()).expect("source");
        let found = source
            .extract(&headers(&[("authorization", "Bearer abc.def.ghi")]))
            .expect("token");
        assert_eq!(found.token, "abc.def.ghi");
        assert_eq!(found.carrier, Carrier::Bearer);
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let source = TokenSource::from_config(&bearer_config()).expect("source");
        let found = source
            .extract(&headers(&[("authorization", "bearer   abc.def.ghi ")]))
            .expect("token");
        assert_eq!(found.token, "abc.def.ghi");
    }

    #[test]
    fn bearer_rejects_other_schemes_and_raw_values() {
        let source = TokenSource::from_config(&bearer_config()).expect("source");
        assert!(source.extract(&headers(&[("authorization", "Basic creds")])).is_none());
        assert!(source.extract(&headers(&[("authorization", "abc.def.ghi")])).is_none());
        assert!(source.extract(&headers(&[("authorization", "Bearer    ")])).is_none());
    }

    #[test]
    fn bearer_with_authorization_name_has_no_fallback() {
        let config = bearer_config().with_auth_token_name("Authorization");
        let source = TokenSource::from_config(&config).expect("source");
        assert!(matches!(source, TokenSource::Bearer { fallback: None }));
    }

    #[test]
    fn bearer_falls_back_to_custom_name() {
        let config = bearer_config().with_auth_token_name("X-Session");
        let source = TokenSource::from_config(&config).expect("source");

        let found = source
            .extract(&headers(&[("x-session", "abc.def.ghi")]))
            .expect("token");
        assert_eq!(found.token, "abc.def.ghi");
        assert_eq!(found.carrier, Carrier::Header(HeaderName::from_static("x-session")));

        let found = source
            .extract(&headers(&[
                ("x-session", "from.custom.header"),
                ("authorization", "Bearer from.bearer.header"),
            ]))
            .expect("token");
        assert_eq!(found.token, "from.bearer.header");
    }

    #[test]
    fn named_reads_header_then_cookie() {
        let config = AuthConfig::new("k", "HS256");
        let source = TokenSource::from_config(&config).expect("source");

        let found = source
            .extract(&headers(&[("x-auth-token", "h.h.h")]))
            .expect("header token");
        assert_eq!(found.token, "h.h.h");

        let found = source
            .extract(&headers(&[("cookie", "theme=dark; X-Auth-Token=c.c.c")]))
            .expect("cookie token");
        assert_eq!(found.token, "c.c.c");
        assert_eq!(found.carrier, Carrier::Cookie("X-Auth-Token".to_string()));
    }

    #[test]
    fn named_ignores_bearer_header() {
        let source = TokenSource::from_config(&AuthConfig::new("k", "HS256")).expect("source");
        assert!(source
            .extract(&headers(&[("authorization", "Bearer abc.def.ghi")]))
            .is_none());
    }

    #[test]
    fn invalid_token_name_is_rejected() {
        let config = AuthConfig::new("k", "HS256").with_auth_token_name("bad name");
        assert_eq!(
            TokenSource::from_config(&config).err(),
            Some(AuthError::InvalidTokenName)
        );
    }

    #[test]
    fn carrier_write_uses_same_convention() {
        let mut out = HeaderMap::new();
        Carrier::Bearer.write(&mut out, "t.t.t", 60);
        assert_eq!(out.get(header::AUTHORIZATION).unwrap(), "Bearer t.t.t");

        let mut out = HeaderMap::new();
        Carrier::Header(HeaderName::from_static("x-auth-token")).write(&mut out, "t.t.t", 60);
        assert_eq!(out.get("x-auth-token").unwrap(), "t.t.t");

        let mut out = HeaderMap::new();
        Carrier::Cookie("session".to_string()).write(&mut out, "t.t.t", 60);
        assert_eq!(
            out.get(header::SET_COOKIE).unwrap(),
            "session=t.t.t; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
    }
}
