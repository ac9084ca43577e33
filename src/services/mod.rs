pub mod posts;
pub mod users;

use diesel::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;

pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;
pub type Pool = diesel_async::pooled_connection::deadpool::Pool<DbConnection>;

pub trait Svc: Clone + Send + Sync + 'static {}

#[cfg(test)]
pub(crate) mod testing {
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use diesel_async::SimpleAsyncConnection;

    use super::{DbConnection, Pool};

    const SCHEMA: &str =
        include_str!("../../migrations/2024-06-01-000000_create_posts_and_users/up.sql");

    // max_size(1) keeps the single `:memory:` connection alive across
    // requests; a second connection would see an empty database.
    pub async fn test_pool() -> Pool {
        let mgr = AsyncDieselConnectionManager::<DbConnection>::new(":memory:");
        let pool = Pool::builder(mgr)
            .max_size(1)
            .build()
            .expect("test pool should build");
        {
            let mut conn = pool.get().await.expect("test pool conn");
            conn.batch_execute(SCHEMA).await.expect("schema should apply");
        }
        pool
    }
}
