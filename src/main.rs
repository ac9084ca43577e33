mod config;
mod error;
mod middleware;
mod models;
mod routes;
mod schema;
mod services;

use axum::Router;
use diesel::Connection;
use diesel_async::pooled_connection::deadpool::{Hook, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use figment::{providers::Format, Figment};
use tera::Tera;
use tracing::*;
use tracing_forest::ForestLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::middleware::logging::HttpLoggingExt;
use crate::services::posts::PostServiceDb;
use crate::services::users::UserServiceDb;
use crate::services::DbConnection;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: config::AppCfg = Figment::new()
        .merge(figment::providers::Json::file("appsettings.json"))
        .merge(figment::providers::Env::prefixed("APP_"))
        .extract()?;

    // initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(ForestLayer::default())
        .init();

    // migrations need a blocking sqlite connection
    let database_url = cfg.database_url.clone();
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut conn = diesel::SqliteConnection::establish(&database_url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("running migrations: {e}"))?;
        Ok(())
    })
    .await??;

    info!("Starting DB pool");
    let mgr = AsyncDieselConnectionManager::<DbConnection>::new(&cfg.database_url);
    let pool = Pool::builder(mgr)
        .max_size(10)
        .post_create(Hook::async_fn(|_conn, metrics| {
            Box::pin(async move {
                trace!(?metrics, "db connection created");
                Ok(())
            })
        }))
        .runtime(deadpool::Runtime::Tokio1)
        .build()?;

    let post_svc = PostServiceDb::new(pool.clone());
    let user_svc = UserServiceDb::new(pool.clone());

    let tera = Tera::new("src/templates/**/*")?;

    let app = Router::new()
        .merge(routes::posts::router().with_state((post_svc, tera.clone())))
        .merge(routes::users::router().with_state((user_svc, tera)))
        .with_http_logging();

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("starting listening at {}", addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
