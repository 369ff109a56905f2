//! 商品数据访问

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use std::sync::RwLock;

use super::model::Product;
use crate::core::error::StoreError;

/// 商品存储：每次调用返回当前全部商品的一份快照
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;
}

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        // 不加 ORDER BY，保持存储的自然顺序
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, description, price, quantity FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

/// 内存实现，用于演示模式和测试
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// 预置两条演示商品
    pub fn with_demo_data() -> Self {
        Self::new(vec![
            Product::new(1, "Widget", Decimal::new(100, 1), 3),
            Product::new(2, "Gadget", Decimal::new(25, 1), 0),
        ])
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let guard = self
            .products
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }
}
