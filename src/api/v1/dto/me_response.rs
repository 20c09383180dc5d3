use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::AuthCtx;

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub refreshed: bool,
}

impl From<AuthCtx> for MeResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            username: ctx.principal,
            token_id: ctx.token_id,
            expires_at: ctx.expires_at,
            refreshed: ctx.refreshed,
        }
    }
}
