//! 应用层：路由与业务模块

pub mod products;

use axum::{middleware, routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::middleware::request_logging_middleware;
use products::{handler, AppState};

/// 创建路由
///
/// 每个请求由 `request_logging_middleware` 记一条日志；`TraceLayer` 只在 debug 级别输出
pub fn create_routes(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
        .on_failure(DefaultOnFailure::new().level(Level::DEBUG));

    Router::new()
        .route("/products", get(handler::list_products))
        .route("/products/report", get(handler::products_report))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(trace)
        .with_state(state)
}
