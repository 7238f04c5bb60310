/*
 * Responsibility
 * - Envoy ext_authz v3 (gRPC) バインディングの公開インターフェース
 */
pub mod proto;
mod request;
mod response;
mod server;

pub use server::{AuthorizationServer, CHECK_PATH, SERVICE_NAME, serve};
