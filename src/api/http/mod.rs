/*
 * Responsibility
 * - Envoy HTTP ext_authz バインディングの公開インターフェース
 */
pub mod handlers;
mod routes;

pub use routes::routes;
