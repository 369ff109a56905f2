//! 商品列表与报表

pub mod handler;
pub mod model;
pub mod report;
pub mod repository;
pub mod service;

pub use handler::AppState;
pub use model::Product;
pub use repository::{InMemoryProductRepository, PgProductRepository, ProductRepository};
pub use service::ProductService;
