/*!
 * Authentication context extractor
 *
 * Public API:
 * - AuthCtx (defined by the authenticator, re-exported here for handlers)
 * - AuthCtxExtractor
 */

mod core;

pub use crate::services::auth::AuthCtx;
pub use core::AuthCtxExtractor;
