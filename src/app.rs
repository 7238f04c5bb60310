/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → SHA-256 self-check → 依存生成
 * - Transport (grpc / http) に応じて listener を bind し serve する
 */
use axum::Router;
use std::{net::SocketAddr, panic, process, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, Transport};
use crate::error::AppError;
use crate::middleware;
use crate::services::authz::{AuthorizationService, policy};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,ext_authz=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    // Fail before binding if the hashing primitive is broken.
    policy::self_check()?;

    let authz = Arc::new(AuthorizationService::default());

    let listener = bind(config.addr).await?;

    tracing::info!(
        "listening on {} ({} transport, {:?} mode)",
        config.addr,
        config.transport,
        config.app_env
    );

    match config.transport {
        Transport::Grpc => api::grpc::serve(listener, authz, shutdown_signal()).await?,
        Transport::Http => {
            let app = build_router(AppState::new(authz), &config);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    tracing::info!("shut down");
    Ok(())
}

/// Binds the listening port. Failure is fatal at startup.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::http::routes().with_state(state);
    middleware::http::apply(router, config.request_timeout)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
