/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: token 検証 → AuthCtx を extensions に入れる
 * - http: request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
