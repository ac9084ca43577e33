use axum::async_trait;
use diesel::prelude::*;

use crate::models::post::*;
use diesel_async::RunQueryDsl;

use crate::schema;

use super::{Pool, Svc};

#[async_trait]
pub trait PostService<E = anyhow::Error>: Svc {
    async fn list_posts(&self) -> Result<Vec<Post>, E>;
    async fn latest_post(&self) -> Result<Post, E>;
    async fn find_post(&self, post_id: i32) -> Result<Post, E>;
    async fn create_post(&self, new: &NewPost) -> Result<Post, E>;
    async fn update_post(&self, post_id: i32, changes: &UpdatePost) -> Result<Post, E>;
    async fn delete_post(&self, post_id: i32) -> Result<(), E>;
}

#[derive(Clone)]
pub struct PostServiceDb {
    db: Pool,
}

impl Svc for PostServiceDb {}

#[async_trait]
impl PostService<anyhow::Error> for PostServiceDb {
    async fn list_posts(&self) -> anyhow::Result<Vec<Post>> {
        use schema::posts::dsl::*;

        let mut conn = self.db.get().await?;
        let ps: Vec<Post> = posts.select(Post::as_select()).load(&mut conn).await?;
        Ok(ps)
    }

    async fn latest_post(&self) -> anyhow::Result<Post> {
        use schema::posts::dsl::*;

        let mut conn = self.db.get().await?;
        let p = posts
            .order(id.desc())
            .select(Post::as_select())
            .first(&mut conn)
            .await?;
        Ok(p)
    }

    async fn find_post(&self, post_id: i32) -> anyhow::Result<Post> {
        use schema::posts::dsl::*;

        let mut conn = self.db.get().await?;
        let p = posts
            .find(post_id)
            .select(Post::as_select())
            .first(&mut conn)
            .await?;
        Ok(p)
    }

    async fn create_post(&self, new: &NewPost) -> anyhow::Result<Post> {
        use schema::posts::dsl::*;

        let mut conn = self.db.get().await?;

        let post = diesel::insert_into(posts)
            .values(new)
            .get_result::<Post>(&mut conn)
            .await?;

        Ok(post)
    }

    async fn update_post(&self, post_id: i32, changes: &UpdatePost) -> anyhow::Result<Post> {
        use schema::posts::dsl::*;

        let mut conn = self.db.get().await?;

        // missing row -> NotFound
        let post = diesel::update(posts.find(post_id))
            .set(changes)
            .get_result::<Post>(&mut conn)
            .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: i32) -> anyhow::Result<()> {
        use schema::posts::dsl::*;

        let mut conn = self.db.get().await?;

        let n = diesel::delete(posts.find(post_id)).execute(&mut conn).await?;
        if n == 0 {
            return Err(diesel::result::Error::NotFound.into());
        }
        Ok(())
    }
}

impl PostServiceDb {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}
