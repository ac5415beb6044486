//! Example consumer: serves /schema, /login and DELETE /crud/:table/:id over PostgreSQL.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! With `SCHEMA_PATH` set, the file is loaded and written to `_sys_tables`; otherwise the stored schema is used.

use schema_crud::{
    app_router, ensure_sys_tables, load_from_path, load_from_pool, replace_schema_rows, AppState, JwtTokenIssuer,
    PgRecordStore, Settings,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("schema_crud=info,example_consumer=info")),
        )
        .init();
    let settings = Settings::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;
    ensure_sys_tables(&pool, &settings.sys_schema).await?;

    let registry = match &settings.schema_path {
        Some(path) => {
            let registry = load_from_path(path).await?;
            let written = replace_schema_rows(&pool, &settings.sys_schema, registry.tables()).await?;
            tracing::info!(written, "schema stored");
            registry
        }
        None => load_from_pool(&pool, &settings.sys_schema).await?,
    };
    let registry = Arc::new(registry);

    let store = PgRecordStore::new(pool, "public", registry.clone());
    let tokens = JwtTokenIssuer::new(settings.jwt_secret.as_bytes(), settings.token_ttl_secs);
    let state = AppState::new(registry, Arc::new(store), Arc::new(tokens)).with_root(settings.root.clone());

    let app = app_router(state, settings.body_limit_bytes);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
