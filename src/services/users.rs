use axum::async_trait;
use diesel::prelude::*;

use crate::models::user::*;
use diesel_async::RunQueryDsl;

use crate::schema;

use super::{Pool, Svc};

#[async_trait]
pub trait UserService<E = anyhow::Error>: Svc {
    /// First user with a matching username; usernames are not unique.
    async fn find_by_username(&self, name: &str) -> Result<Option<User>, E>;
}

#[derive(Clone)]
pub struct UserServiceDb {
    db: Pool,
}

impl Svc for UserServiceDb {}

#[async_trait]
impl UserService<anyhow::Error> for UserServiceDb {
    async fn find_by_username(&self, name: &str) -> anyhow::Result<Option<User>> {
        use schema::users::dsl::*;

        let mut conn = self.db.get().await?;
        let u = users
            .filter(username.eq(name))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(u)
    }
}

impl UserServiceDb {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}
