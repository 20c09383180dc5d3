/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/me は access middleware 配下
 * - /token は開発環境のみ (資格情報の検証を持たないため)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{health::health, me::me, token::token};
use crate::config::AppEnv;
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState, app_env: AppEnv) -> Router<AppState> {
    let protected = access::apply(Router::new().route("/me", get(me)), state);

    let router = Router::new()
        .route("/health", get(health))
        .merge(protected);

    if app_env.is_production() {
        router
    } else {
        router.route("/token", post(token))
    }
}
