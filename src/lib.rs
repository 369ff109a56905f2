//! # 商品报表服务
//!
//! 提供两个 HTTP 接口：
//! - `GET /products`：以 JSON 返回全部商品
//! - `GET /products/report`：把全部商品渲染成带合计的 PDF 报表
//!
//! 分层结构：
//! - `app`：路由、处理器、业务服务与报表组装
//! - `core`：错误处理与中间件
//! - `infrastructure`：数据库连接池与日志
//! - `pdf`：文档布局描述与 lopdf 渲染器

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod pdf;

pub use app::create_routes;
pub use app::products::{AppState, Product, ProductRepository, ProductService};
