//! Cloud Notes API 서버.
//!
//! 설정을 로드하고 PostgreSQL에 연결한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

use notes_api::auth::{CredentialHasher, TokenCodec};
use notes_api::metrics::setup_metrics_recorder;
use notes_api::repository::{run_migrations, Storage};
use notes_api::routes::create_app;
use notes_api::state::AppState;
use notes_core::{init_logging, AppConfig, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("설정을 불러올 수 없습니다")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    config.validate().map_err(|e| {
        error!(error = %e, "설정이 유효하지 않습니다. NOTES__ 환경변수를 확인하세요.");
        e
    })?;

    info!("Starting Cloud Notes API server...");

    // Prometheus 메트릭 레코더 (실패해도 서버는 계속 동작)
    let metrics_handle = match setup_metrics_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder initialized");
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Failed to install metrics recorder, /metrics disabled");
            None
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("데이터베이스에 연결할 수 없습니다")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to PostgreSQL"
    );

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("마이그레이션 실패")?;
        info!("Database migrations applied");
    }

    let hasher = CredentialHasher::new(&config.password).context("Argon2 설정 오류")?;
    let codec = TokenCodec::from_config(&config.jwt);
    if config.jwt.ttl_minutes == 0 {
        warn!("jwt.ttl_minutes = 0: issued tokens never expire");
    }

    let state = AppState::new(Storage::postgres(pool.clone()), hasher, codec, &config.auth)
        .with_db_pool(pool);

    let app = create_app(
        Arc::new(state),
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{} 에 바인딩할 수 없습니다", addr))?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("서버 실행 중 오류")?;

    info!("Server stopped");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM을 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
