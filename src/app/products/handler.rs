//! 商品处理器

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use super::{model::Product, service::ProductService};
use crate::core::error::CoreError;

pub const REPORT_FILENAME: &str = "products-report.pdf";

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

pub async fn products_report(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CoreError> {
    let pdf = state.product_service.generate_report().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        pdf,
    ))
}
