//! PostgreSQL connection pool factory.
//!
//! The reference schema lives in `schema.sql`; migrations are applied out
//! of band.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use bookshelf_kernel::DatabaseSettings;

/// Open a connection pool against the configured PostgreSQL instance.
///
/// The pool handle is cheap to clone and safe to share across in-flight
/// requests.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let url = settings.connection_url();

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&url)
        .await
        .with_context(|| {
            format!(
                "failed to connect to database '{}' at {}:{}",
                settings.database, settings.host, settings.port
            )
        })?;

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        "database pool established"
    );

    Ok(pool)
}
