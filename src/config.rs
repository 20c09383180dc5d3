/*
 * Responsibility
 * - 環境変数の読み込み (signing key / token windows / token names / HTTP limits)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct HttpLimits {
    pub body_limit_bytes: usize,
    pub timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub auth: AuthConfig,
    pub http: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_var("PORT")?.unwrap_or(3000);
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();
        let auth = auth_config_from_env()?;

        let defaults = HttpLimits::default();
        let http = HttpLimits {
            body_limit_bytes: parse_var("HTTP_BODY_LIMIT_BYTES")?
                .unwrap_or(defaults.body_limit_bytes),
            timeout: parse_var("HTTP_TIMEOUT_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        Ok(Self {
            addr,
            app_env,
            auth,
            http,
        })
    }
}

/// Token settings only; shared by the server and `token-gen`.
pub fn auth_config_from_env() -> Result<AuthConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let signing_key =
        env::var("TOKEN_SIGNING_KEY").map_err(|_| ConfigError::Missing("TOKEN_SIGNING_KEY"))?;
    let signing_method = env::var("TOKEN_SIGNING_METHOD").unwrap_or_else(|_| "HS256".to_string());

    // Zero selects the built-in default window.
    let auth_secs: u64 = parse_var("AUTH_TOKEN_VALID_SECONDS")?.unwrap_or(0);
    let refresh_secs: u64 = parse_var("REFRESH_TOKEN_VALID_SECONDS")?.unwrap_or(0);

    Ok(AuthConfig::new(signing_key, signing_method)
        .with_bearer_tokens(parse_bool_var("TOKEN_BEARER")?.unwrap_or(true))
        .with_auth_token_valid_time(Duration::from_secs(auth_secs))
        .with_refresh_token_valid_time(Duration::from_secs(refresh_secs))
        .with_auth_token_name(env::var("AUTH_TOKEN_NAME").unwrap_or_default())
        .with_refresh_token_name(env::var("REFRESH_TOKEN_NAME").unwrap_or_default()))
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        _ => Ok(None),
    }
}

fn parse_bool_var(key: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_bool(&raw)
            .map(Some)
            .ok_or(ConfigError::Invalid(key)),
        _ => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
