//! 스키마 마이그레이션 실행기.
//!
//! 서버와 같은 설정(`config/default.toml`, `NOTES__DATABASE__URL`)을 사용합니다.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use notes_api::repository::run_migrations;
use notes_core::{init_logging, AppConfig, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("설정을 불러올 수 없습니다")?;
    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    if config.database.url.is_empty() {
        anyhow::bail!("database.url 이 비어 있습니다 (NOTES__DATABASE__URL 또는 DATABASE_URL)");
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("데이터베이스에 연결할 수 없습니다")?;

    run_migrations(&pool).await.context("마이그레이션 실패")?;
    info!("Migrations applied");

    Ok(())
}
