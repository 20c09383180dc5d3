use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::{Value, json};
use token_gate::app::{build_router, build_state};
use token_gate::config::{AppEnv, Config, HttpLimits};
use token_gate::AuthConfig;
use tower::util::ServiceExt;

fn auth_config() -> AuthConfig {
    AuthConfig::new("integration_key", "HS256")
        .with_bearer_tokens(true)
        .with_auth_token_valid_time(Duration::from_secs(60))
}

fn app(app_env: AppEnv) -> Router {
    let config = Config {
        addr: "127.0.0.1:0".parse().expect("addr"),
        app_env,
        auth: auth_config(),
        http: HttpLimits::default(),
    };
    let state = build_state(&config).expect("state");
    build_router(state, config.app_env, &config.http)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn get_me(headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/api/v1/me");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).expect("request")
}

fn post_token(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_is_public() {
    let response = app(AppEnv::Development)
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_403_with_error_body() {
    let response = app(AppEnv::Development)
        .oneshot(get_me(&[]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"error": {"code": "FORBIDDEN", "message": "empty auth token"}})
    );
}

#[tokio::test]
async fn issued_token_grants_access() {
    let token = auth_config()
        .issue_new_token("test_user", Duration::from_secs(60))
        .expect("token");
    let bearer = format!("Bearer {token}");

    let response = app(AppEnv::Development)
        .oneshot(get_me(&[("authorization", bearer.as_str())]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "test_user");
    assert_eq!(body["refreshed"], false);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let token = auth_config()
        .issue_new_token("test_user", Duration::from_secs(60))
        .expect("token");
    let (head, sig) = token.rsplit_once('.').expect("segments");
    let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
    let bearer = format!("Bearer {head}.{flipped}{}", &sig[1..]);

    let response = app(AppEnv::Development)
        .oneshot(get_me(&[("authorization", bearer.as_str())]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "invalid signature");
}

#[tokio::test]
async fn expired_token_without_refresh_is_rejected() {
    let token = auth_config()
        .issue_new_token_at(
            "test_user",
            Duration::from_secs(5),
            Utc::now() - chrono::Duration::minutes(5),
        )
        .expect("token");
    let bearer = format!("Bearer {token}");

    let response = app(AppEnv::Development)
        .oneshot(get_me(&[("authorization", bearer.as_str())]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "auth token expired");
}

#[tokio::test]
async fn expired_token_with_refresh_is_replaced_on_response() {
    let config = auth_config();
    let token = config
        .issue_new_token_at(
            "test_user",
            Duration::from_secs(5),
            Utc::now() - chrono::Duration::minutes(5),
        )
        .expect("token");
    let refresh = config.issue_refresh_token("test_user").expect("refresh");
    let bearer = format!("Bearer {token}");

    let response = app(AppEnv::Development)
        .oneshot(get_me(&[
            ("authorization", bearer.as_str()),
            ("x-refresh-token", refresh.as_str()),
        ]))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let renewed = response
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .expect("renewed token header");
    assert_ne!(renewed, token);

    let body = body_json(response).await;
    assert_eq!(body["username"], "test_user");
    assert_eq!(body["refreshed"], true);

    let bearer = format!("Bearer {renewed}");
    let response = app(AppEnv::Development)
        .oneshot(get_me(&[("authorization", bearer.as_str())]))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn token_endpoint_issues_and_refreshes() {
    let response = app(AppEnv::Development)
        .oneshot(post_token(json!({"username": "test_user"})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let issued = body_json(response).await;
    assert_eq!(issued["token_type"], "Bearer");
    assert_eq!(issued["expires_in"], 60);
    let refresh_token = issued["refresh_token"].as_str().expect("refresh token");

    let response = app(AppEnv::Development)
        .oneshot(post_token(json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed = body_json(response).await;
    let auth_token = refreshed["auth_token"].as_str().expect("auth token");
    let bearer = format!("Bearer {auth_token}");

    let response = app(AppEnv::Development)
        .oneshot(get_me(&[("authorization", bearer.as_str())]))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn token_endpoint_rejects_blank_username() {
    let response = app(AppEnv::Development)
        .oneshot(post_token(json!({"username": ""})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "username is required to generate payload"
    );
}

#[tokio::test]
async fn token_endpoint_is_absent_in_production() {
    let response = app(AppEnv::Production)
        .oneshot(post_token(json!({"username": "test_user"})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
