use std::sync::Arc;

use products_report::app::products::{
    InMemoryProductRepository, PgProductRepository, ProductRepository,
};
use products_report::config::{self, StoreBackend};
use products_report::infrastructure::{database::DatabaseManager, logger::Logger};
use products_report::pdf::{FontFamily, PdfRenderer};
use products_report::{create_routes, AppState, ProductService};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config()?;

    Logger::init(&config.logging.level);

    info!("启动商品报表服务...");

    let repository: Arc<dyn ProductRepository> = match config.database.backend {
        StoreBackend::Postgres => {
            let database = DatabaseManager::new(&config.database).map_err(|e| {
                error!("数据库连接池创建失败: {}", e);
                e
            })?;
            if config.database.auto_migrate {
                database.init_schema().await?;
            }
            Arc::new(PgProductRepository::new(database.get_pool().clone()))
        }
        StoreBackend::Memory => {
            info!("使用内存演示数据");
            Arc::new(InMemoryProductRepository::with_demo_data())
        }
    };

    let renderer = PdfRenderer::new(FontFamily::helvetica())?;
    let state = AppState {
        product_service: ProductService::new(repository, renderer),
    };

    let app = create_routes(state);

    let listener = TcpListener::bind((config.http.bind_address.as_str(), config.http.port)).await?;
    let addr = listener.local_addr()?;

    info!("🚀 服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /products          - 商品列表 (JSON)");
    info!("   GET    /products/report   - 商品报表 (PDF)");

    axum::serve(listener, app).await?;

    Ok(())
}
