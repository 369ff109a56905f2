//! 商品业务服务

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::info;

use super::model::Product;
use super::report::ProductReport;
use super::repository::ProductRepository;
use crate::core::error::CoreError;
use crate::pdf::{PdfRenderer, RenderError};

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    renderer: Arc<PdfRenderer>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, renderer: PdfRenderer) -> Self {
        Self {
            repository,
            renderer: Arc::new(renderer),
        }
    }

    /// 返回全部商品，保持存储顺序
    pub async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        let products = self.repository.find_all().await?;
        Ok(products)
    }

    /// 以当前本地时间生成 PDF 报表
    pub async fn generate_report(&self) -> Result<Vec<u8>, CoreError> {
        self.generate_report_at(Local::now().naive_local()).await
    }

    /// 以指定生成时间生成 PDF 报表
    pub async fn generate_report_at(
        &self,
        generated_at: NaiveDateTime,
    ) -> Result<Vec<u8>, CoreError> {
        let products = self.repository.find_all().await?;
        let report = ProductReport::from_snapshot(&products, generated_at);
        let document = report.to_document();

        // 排版和写 PDF 是纯 CPU 工作，放到阻塞线程池
        let renderer = Arc::clone(&self.renderer);
        let pdf = tokio::task::spawn_blocking(move || renderer.render(&document))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        info!(
            "报表生成完成: {} 个商品, 合计数量 {}, {} 字节",
            report.rows.len(),
            report.total_quantity,
            pdf.len()
        );

        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::repository::InMemoryProductRepository;
    use crate::core::error::StoreError;
    use crate::pdf::FontFamily;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct UnreachableRepository;

    #[async_trait]
    impl ProductRepository for UnreachableRepository {
        async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn service(repository: Arc<dyn ProductRepository>) -> ProductService {
        ProductService::new(repository, PdfRenderer::new(FontFamily::helvetica()).unwrap())
    }

    #[tokio::test]
    async fn test_list_products_returns_snapshot() {
        let products = vec![
            Product::new(1, "Widget", Decimal::new(10, 0), 3),
            Product::new(2, "Gadget", Decimal::new(25, 1), 0),
        ];
        let service = service(Arc::new(InMemoryProductRepository::new(products.clone())));

        assert_eq!(service.list_products().await.unwrap(), products);
    }

    #[tokio::test]
    async fn test_list_products_empty_store() {
        let service = service(Arc::new(InMemoryProductRepository::default()));
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_report_produces_pdf() {
        let products = vec![Product::new(1, "Widget", Decimal::new(10, 0), 3)];
        let service = service(Arc::new(InMemoryProductRepository::new(products)));

        let pdf = service.generate_report().await.unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_both_operations() {
        let service = service(Arc::new(UnreachableRepository));

        assert!(matches!(
            service.list_products().await,
            Err(CoreError::StorageUnavailable(_))
        ));
        assert!(matches!(
            service.generate_report().await,
            Err(CoreError::StorageUnavailable(_))
        ));
    }
}
