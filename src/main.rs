use ecommerce_order_management::adapter::driven::{
    ConsoleLogger, MySqlOrderRepository, MySqlProductRepository, MySqlUnitOfWorkFactory,
};
use ecommerce_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use ecommerce_order_management::adapter::{DatabaseConfig, DatabaseMigration, ServerConfig};
use ecommerce_order_management::application::service::{
    OrderApplicationService, OrderQueryService, ProductApplicationService,
};

use axum::http::{header, HeaderValue, Method};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ECサイト注文管理 REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // ロガーとアダプターを作成
    let logger = Arc::new(ConsoleLogger::new());
    let uow_factory = Arc::new(MySqlUnitOfWorkFactory::new(pool.clone()));
    let order_repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
    let product_repository = Arc::new(MySqlProductRepository::new(pool.clone()));

    // アプリケーションサービスを作成
    let order_service = OrderApplicationService::new(uow_factory, logger.clone());
    let order_query_service = OrderQueryService::new(order_repository);
    let product_service = ProductApplicationService::new(product_repository);

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        order_service: Arc::new(order_service),
        order_query_service: Arc::new(order_query_service),
        product_service: Arc::new(product_service),
        logger: logger.clone(),
    };

    // CORSはフロントエンドの開発用オリジンのみ許可する
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:5173".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-user-id"),
        ]);

    // REST APIルーターを作成
    let app = create_router().layer(cors).with_state(app_state);

    // サーバーを起動
    let server_config = ServerConfig::from_env()?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    println!(
        "REST APIサーバーが起動しました: http://localhost:{}",
        server_config.port
    );
    println!("ヘルスチェック: GET http://localhost:{}/health", server_config.port);
    println!("API仕様:");
    println!("  POST   /orders - 注文作成（X-User-Idヘッダー必須）");
    println!("  GET    /orders - 自分の注文一覧取得");
    println!("  GET    /orders/:id - 注文詳細取得");
    println!("  DELETE /orders/:id - 注文キャンセル");
    println!("  POST   /products - 商品登録（カタログ管理用）");
    println!("  GET    /products - 商品一覧取得");
    println!("  GET    /products/:id - 商品詳細取得");
    println!("  DELETE /products/:id - 商品削除");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
