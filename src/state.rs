/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc)
 * - 可変な共有状態は持たない
 */
use std::sync::Arc;

use crate::services::authz::AuthorizationService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub authz: Arc<AuthorizationService>,
}

impl AppState {
    pub fn new(authz: Arc<AuthorizationService>) -> Self {
        Self { authz }
    }
}
