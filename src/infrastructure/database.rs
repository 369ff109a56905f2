//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 创建连接池；连接延迟到第一次查询时建立，数据库不可用时服务仍能启动
    pub fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!(
            "连接数据库: {}",
            mask_password(&config.url)
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_lazy(&config.url)?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 创建商品表（如不存在）
    pub async fn init_schema(&self) -> Result<(), Error> {
        info!("初始化数据表...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id SERIAL PRIMARY KEY,
                description TEXT NOT NULL,
                price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
                quantity INTEGER NOT NULL CHECK (quantity >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("数据表初始化完成");
        Ok(())
    }
}

/// 隐藏连接串中的密码
fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => match credentials.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}
