use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use http_body_util::{BodyExt, Full};
use prost::Message;
use tower::ServiceExt;

use ext_authz::api::grpc::{
    AuthorizationServer, CHECK_PATH,
    proto::{
        AttributeContext, CheckRequest, CheckResponse, attribute_context,
        check_response::HttpResponse,
    },
};
use ext_authz::services::authz::{
    AuthorizationService,
    decision::{DENIED_BODY, RATELIMIT_HEADER},
    policy::fingerprint,
};

fn server() -> AuthorizationServer {
    AuthorizationServer::new(Arc::new(AuthorizationService::default()))
}

fn check_request(authorization: Option<&str>) -> CheckRequest {
    let mut http = attribute_context::HttpRequest {
        method: "GET".into(),
        path: "/".into(),
        ..Default::default()
    };
    if let Some(value) = authorization {
        http.headers.insert("authorization".into(), value.into());
    }
    CheckRequest {
        attributes: Some(AttributeContext {
            request: Some(attribute_context::Request { http: Some(http) }),
            ..Default::default()
        }),
    }
}

// Length-prefixed gRPC message: 1 byte compression flag + 4 byte big-endian length.
fn frame(msg: &CheckRequest) -> Bytes {
    let encoded = msg.encode_to_vec();
    let mut buf = BytesMut::with_capacity(encoded.len() + 5);
    buf.put_u8(0);
    buf.put_u32(encoded.len() as u32);
    buf.put_slice(&encoded);
    buf.freeze()
}

async fn call(path: &str, msg: &CheckRequest) -> (Option<String>, Option<CheckResponse>) {
    let req = http::Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/grpc")
        .header("te", "trailers")
        .body(Full::new(frame(msg)))
        .unwrap();

    let resp = server().oneshot(req).await.unwrap();
    let header_status = resp
        .headers()
        .get("grpc-status")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let collected = resp.into_body().collect().await.unwrap();
    let trailer_status = collected
        .trailers()
        .and_then(|t| t.get("grpc-status"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let data = collected.to_bytes();

    let message = if data.len() > 5 {
        Some(CheckResponse::decode(&data[5..]).unwrap())
    } else {
        None
    };

    (trailer_status.or(header_status), message)
}

#[tokio::test]
async fn allow_returns_ok_with_fingerprint_attachment() {
    let (grpc_status, resp) = call(CHECK_PATH, &check_request(Some("Bearer foo"))).await;

    assert_eq!(grpc_status.as_deref(), Some("0"));
    let resp = resp.unwrap();
    assert_eq!(resp.status.map(|s| s.code), Some(0));

    let Some(HttpResponse::OkResponse(ok)) = resp.http_response else {
        panic!("expected ok_response");
    };
    assert_eq!(ok.headers.len(), 1);
    let header = ok.headers[0].header.clone().unwrap();
    assert_eq!(header.key, RATELIMIT_HEADER);
    assert_eq!(header.value, fingerprint("foo"));
}

#[tokio::test]
async fn deny_returns_unauthenticated_and_401() {
    for auth in [
        Some("Bearer badtoken"),
        None,
        Some("Basic abc123"),
        Some("Bearer "),
    ] {
        let (grpc_status, resp) = call(CHECK_PATH, &check_request(auth)).await;

        // The call itself succeeds; the denial is data.
        assert_eq!(grpc_status.as_deref(), Some("0"), "{auth:?}");
        let resp = resp.unwrap();
        assert_eq!(resp.status.map(|s| s.code), Some(16), "{auth:?}");

        let Some(HttpResponse::DeniedResponse(denied)) = resp.http_response else {
            panic!("expected denied_response for {auth:?}");
        };
        assert_eq!(denied.status.map(|s| s.code), Some(401));
        assert_eq!(denied.body, DENIED_BODY);
    }
}

#[tokio::test]
async fn empty_check_request_is_denied() {
    let (_, resp) = call(CHECK_PATH, &CheckRequest::default()).await;

    let Some(HttpResponse::DeniedResponse(denied)) = resp.unwrap().http_response else {
        panic!("expected denied_response");
    };
    assert_eq!(denied.status.map(|s| s.code), Some(401));
}

#[tokio::test]
async fn unknown_method_is_unimplemented() {
    let (grpc_status, resp) = call(
        "/envoy.service.auth.v3.Authorization/Nope",
        &check_request(Some("Bearer foo")),
    )
    .await;

    assert_eq!(grpc_status.as_deref(), Some("12"));
    assert!(resp.is_none());
}
