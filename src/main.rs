use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use bookshelf_kernel::Settings;

use bookshelf_app::modules::library;
use bookshelf_app::modules::library::service::{LibraryService, UuidGenerator};
use bookshelf_app::modules::library::store::PgLibraryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)
        .with_context(|| "failed to initialize logging")?;

    tracing::info!(
        env = ?settings.environment,
        db_host = %settings.database.host,
        "bookshelf bootstrap starting"
    );

    let pool = bookshelf_db::connect(&settings.database).await?;
    let store = Arc::new(PgLibraryStore::new(pool));
    let service = Arc::new(LibraryService::new(store, Arc::new(UuidGenerator)));

    let app = bookshelf_http::RouterBuilder::new()
        .route("/healthz", get(health_check))
        .mount(library::routes::routes(service))
        .with_method_gate()
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build();

    bookshelf_http::serve(app, &settings.server).await
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
