//! External authorization decision service.
//!
//! A proxy calls `Check` once per request; the service extracts a bearer
//! token, evaluates it and answers allow (with attachment headers) or deny.
//! Served as Envoy ext_authz over gRPC, or over plain HTTP.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
