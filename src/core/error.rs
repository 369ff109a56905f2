//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::pdf::RenderError;

/// 数据存储错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("数据库访问失败: {0}")]
    Database(#[from] sqlx::Error),

    #[error("存储不可用: {0}")]
    Unavailable(String),
}

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("存储不可用: {0}")]
    StorageUnavailable(#[from] StoreError),

    #[error("报表渲染失败: {0}")]
    RenderFailure(#[from] RenderError),
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        // 内部原因只写日志，不返回给调用方
        error!("请求处理失败: {}", self);

        let (status, error_code, user_message) = match self {
            CoreError::StorageUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_UNAVAILABLE",
                "数据存储暂时不可用",
            ),
            CoreError::RenderFailure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "RENDER_FAILURE",
                "报表生成失败",
            ),
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message: user_message.to_string(),
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_500() {
        let err = CoreError::from(StoreError::Unavailable("connection refused".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_sqlx_error_is_storage_unavailable() {
        let store = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(store, StoreError::Database(sqlx::Error::PoolTimedOut)));

        let err = CoreError::from(store);
        assert!(matches!(err, CoreError::StorageUnavailable(StoreError::Database(_))));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_render_error_maps_to_500() {
        let err = CoreError::from(RenderError::UnsupportedFont("Courier".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body_hides_internal_cause() {
        let err = CoreError::from(StoreError::Unavailable("password authentication failed".to_string()));
        let response = err.into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(parsed.error, "STORAGE_UNAVAILABLE");
        assert_eq!(parsed.code, 500);
        assert!(!parsed.message.contains("password"));
    }
}
