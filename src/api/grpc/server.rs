//! tonic service for `envoy.service.auth.v3.Authorization`.
//!
//! Hand-written equivalent of what tonic codegen emits for a single unary
//! method, so the crate builds without `protoc`.
use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

use super::proto::{CheckRequest, CheckResponse};
use crate::services::authz::{
    AuthorizationService, FixedLengthValidator, IncomingRequestContext, TokenValidator,
};

pub const SERVICE_NAME: &str = "envoy.service.auth.v3.Authorization";
pub const CHECK_PATH: &str = "/envoy.service.auth.v3.Authorization/Check";

type StdError = Box<dyn std::error::Error + Send + Sync + 'static>;
type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

pub struct AuthorizationServer<V = FixedLengthValidator> {
    inner: Arc<AuthorizationService<V>>,
}

impl<V> AuthorizationServer<V> {
    pub fn new(inner: Arc<AuthorizationService<V>>) -> Self {
        Self { inner }
    }
}

impl<V> Clone for AuthorizationServer<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> tonic::server::NamedService for AuthorizationServer<V> {
    const NAME: &'static str = SERVICE_NAME;
}

struct CheckSvc<V>(Arc<AuthorizationService<V>>);

impl<V: TokenValidator> tonic::server::UnaryService<CheckRequest> for CheckSvc<V> {
    type Response = CheckResponse;
    type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

    fn call(&mut self, request: tonic::Request<CheckRequest>) -> Self::Future {
        let inner = Arc::clone(&self.0);
        Box::pin(async move {
            let ctx = IncomingRequestContext::from(request.into_inner());
            let decision = inner.check(&ctx).await;
            Ok(tonic::Response::new(CheckResponse::from(decision)))
        })
    }
}

impl<V, B> tower::Service<http::Request<B>> for AuthorizationServer<V>
where
    V: TokenValidator,
    B: http_body::Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::Body>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        if req.uri().path() != CHECK_PATH {
            return Box::pin(async move { Ok(unimplemented_response()) });
        }

        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let codec = tonic_prost::ProstCodec::<CheckResponse, CheckRequest>::default();
            let mut grpc = tonic::server::Grpc::new(codec);
            Ok(grpc.unary(CheckSvc(inner), req).await)
        })
    }
}

fn unimplemented_response() -> http::Response<tonic::body::Body> {
    let mut response = http::Response::new(tonic::body::Body::default());
    let headers = response.headers_mut();
    headers.insert(
        "grpc-status",
        http::HeaderValue::from(tonic::Code::Unimplemented as i32),
    );
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/grpc"),
    );
    response
}

/// Serves the Check RPC on `listener` until `shutdown` resolves.
pub async fn serve<V, F>(
    listener: TcpListener,
    service: Arc<AuthorizationService<V>>,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    V: TokenValidator,
    F: Future<Output = ()>,
{
    tonic::transport::Server::builder()
        .add_service(AuthorizationServer::new(service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
