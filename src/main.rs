use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heroquery_backend::{api, config, convert, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heroquery_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().expect("Failed to load configuration");
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| app_config.get_database_url());

    let pool = SqlitePool::connect(&database_url).await?;

    // WAL mode for concurrent readers / 启用WAL模式，提高并发性能
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout=5000").execute(&pool).await?;

    db::run_migrations(&pool).await?;

    // Conversion table is loaded once, before any request is served /
    // 转换表在启动时加载一次
    let conversion = match app_config.conversion.table_file.as_str() {
        "" => {
            tracing::info!("Using builtin traditional→simplified table");
            convert::ConversionTable::builtin()
        }
        path => convert::ConversionTable::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load conversion table: {}", e))?,
    };

    let state = Arc::new(AppState::new(
        pool,
        Arc::new(conversion),
        Duration::from_secs(app_config.search.store_timeout_secs),
    ));

    let app = api::router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
