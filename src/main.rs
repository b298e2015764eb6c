//! Inventory Server - materials, loans and file storage
//!
//! A Rust REST API server for inventory management.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_server::{
    config::{AppConfig, DatabaseBackend, ObjectStoreBackend},
    create_router,
    repository::{memory::MemoryDocumentStore, postgres::PgDocumentStore, store::DocumentStore, Repository},
    services::Services,
    storage::{memory::MemoryObjectStore, s3::S3ObjectStore, ObjectStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("inventory_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Inventory Server v{}", env!("CARGO_PKG_VERSION"));

    let document_store: Arc<dyn DocumentStore> = match config.database.backend {
        DatabaseBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations completed");

            Arc::new(PgDocumentStore::new(pool))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory document store, data is lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let object_store: Arc<dyn ObjectStore> = match config.object_store.backend {
        ObjectStoreBackend::S3 => Arc::new(S3ObjectStore::from_config(&config.object_store).await),
        ObjectStoreBackend::Memory => {
            tracing::warn!("Using the in-memory object store, uploads are lost on exit");
            Arc::new(MemoryObjectStore::new(config.object_store.public_base_url.clone()))
        }
    };

    if config.consistency.atomic_adjustments {
        tracing::info!("Loaned quantities adjusted with atomic increments");
    }

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let repository = Repository::new(document_store, &config.database);
    let services = Services::new(repository, object_store, &config);
    let app = create_router(AppState::new(config, services));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
