use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::v1::dto::{token_request::TokenRequest, token_response::TokenResponse};
use crate::error::AuthError;
use crate::state::AppState;

pub async fn token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let config = state.auth.config();

    match req.grant_type.as_deref() {
        Some("refresh_token") => {
            let refresh_token = req.refresh_token.ok_or(AuthError::EmptyToken)?;
            let auth_token = state.auth.refresh(&refresh_token)?;

            Ok((
                StatusCode::OK,
                Json(TokenResponse {
                    auth_token,
                    token_type: "Bearer".to_string(),
                    expires_in: config.effective_auth_token_valid_time().as_secs(),
                    refresh_token,
                }),
            ))
        }
        _ => {
            let username = req.username.unwrap_or_default();
            let pair = config.issue_token_pair(&username)?;

            Ok((StatusCode::OK, Json(TokenResponse::from(pair))))
        }
    }
}
