/*
 * Responsibility
 * - CheckRequest (wire) → IncomingRequestContext への変換
 * - 欠けたサブメッセージは空のコンテキストとして扱う (エラーにしない)
 */
use super::proto::{CheckRequest, attribute_context::HttpRequest};
use crate::services::authz::IncomingRequestContext;

impl From<CheckRequest> for IncomingRequestContext {
    fn from(req: CheckRequest) -> Self {
        req.attributes
            .and_then(|attrs| attrs.request)
            .and_then(|request| request.http)
            .map(context_from_http)
            .unwrap_or_default()
    }
}

fn context_from_http(http: HttpRequest) -> IncomingRequestContext {
    let mut ctx = IncomingRequestContext::new(http.method, http.path);

    for (name, value) in http.headers {
        ctx.insert_header(&name, value);
    }

    // Envoy sends headers here instead of `headers` when raw header encoding is on.
    if let Some(header_map) = http.header_map {
        for header in header_map.headers {
            let value = if header.value.is_empty() {
                String::from_utf8_lossy(&header.raw_value).into_owned()
            } else {
                header.value
            };
            ctx.insert_header(&header.key, value);
        }
    }

    ctx
}
