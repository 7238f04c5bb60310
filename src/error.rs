/*
 * Responsibility
 * - アプリ共通の AppError 定義 (起動 / transport の失敗)
 * - ポリシー判定の結果 (Deny) はエラーではなく Decision で表す
 * - IntoResponse 実装 (HTTP バインディングの 500 用, 内部詳細は出さない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::authz::policy::SelfCheckError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    SelfCheck(#[from] SelfCheckError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("http server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("grpc server error: {0}")]
    Grpc(#[from] tonic::transport::Error),

    #[error("attachment header is not representable: {0}")]
    InvalidAttachment(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        let body = ErrorResponse {
            error: ErrorBody {
                code: "INTERNAL_SERVER_ERROR",
                message: "internal server error",
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
