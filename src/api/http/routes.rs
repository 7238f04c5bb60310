/*
 * Responsibility
 * - HTTP バインディングの Router 組み立て
 * - ext_authz はパスを問わず全リクエストが Check なので fallback に載せる
 */
use axum::Router;

use crate::api::http::handlers::check::check;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().fallback(check)
}
