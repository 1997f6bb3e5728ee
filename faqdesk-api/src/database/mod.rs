use anyhow::{Context, Result};
use faqdesk_core::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(settings: &DatabaseSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds))
            .connect(&settings.url)
            .await
            .context("Failed to connect to database")?;

        Ok(Database { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<bool> {
        let result: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(result == 1)
    }
}

/// 连接 DATABASE_URL（默认本地 faqdesk_test）并执行迁移，仅供需要真实数据库的测试使用
#[cfg(test)]
pub(crate) async fn connect_test_database() -> Database {
    let settings = DatabaseSettings {
        url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/faqdesk_test".to_string()),
        ..DatabaseSettings::default()
    };
    let db = Database::new(&settings).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}
