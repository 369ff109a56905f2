//! 商品数据模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
}

impl Product {
    pub fn new(id: i32, description: impl Into<String>, price: Decimal, quantity: i32) -> Self {
        Self {
            id,
            description: description.into(),
            price,
            quantity,
        }
    }
}
