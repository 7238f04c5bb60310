/*
 * Responsibility
 * - Envoy HTTP ext_authz: 受け取ったリクエスト (method/path/headers) をそのまま Check する
 * - Allow → 200 + attachment headers / Deny → 401 + 固定 body
 */
use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::authz::{Decision, IncomingRequestContext};
use crate::state::AppState;

pub async fn check(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let ctx = context_from_parts(&method, &uri, &headers);
    let decision = state.authz.check(&ctx).await;
    decision_response(decision)
}

fn context_from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> IncomingRequestContext {
    let mut ctx = IncomingRequestContext::new(method.as_str(), uri.path());
    for (name, value) in headers {
        // Same decoding as the gRPC raw header path.
        ctx.insert_header(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    ctx
}

fn decision_response(decision: Decision) -> Result<Response, AppError> {
    match decision {
        Decision::Allow { attachments } => {
            let mut headers = HeaderMap::with_capacity(attachments.len());
            for (name, value) in attachments {
                let name = HeaderName::try_from(name.as_str())
                    .map_err(|_| AppError::InvalidAttachment(name.clone()))?;
                let value = HeaderValue::try_from(value)
                    .map_err(|_| AppError::InvalidAttachment(name.as_str().to_string()))?;
                headers.insert(name, value);
            }
            Ok((StatusCode::OK, headers).into_response())
        }
        Decision::Deny { status_code, body } => {
            let status =
                StatusCode::from_u16(status_code).unwrap_or(StatusCode::UNAUTHORIZED);
            Ok((
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response())
        }
    }
}
