use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Form, Router};
use tera::Tera;
use tracing::info;

use crate::error::AppError;
use crate::models::post::{NewPost, UpdatePost};
use crate::services::posts::PostService;

type PostsRouteState<S> = (S, Tera);

async fn index<S: PostService>(
    State((svc, tera)): State<PostsRouteState<S>>,
) -> Result<Html<String>, AppError> {
    let posts = svc.list_posts().await?;

    let mut ctx = tera::Context::new();
    ctx.insert("posts", &posts);
    Ok(Html(tera.render("index.html", &ctx)?))
}

#[tracing::instrument(skip_all)]
async fn create_post<S: PostService>(
    State((svc, _)): State<PostsRouteState<S>>,
    Form(new): Form<NewPost>,
) -> Result<Redirect, AppError> {
    let post = svc.create_post(&new).await?;
    info!(id = post.id, "post created");

    Ok(Redirect::to("/"))
}

async fn show_post<S: PostService>(
    State((svc, tera)): State<PostsRouteState<S>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let post = svc.find_post(id).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("post", &post);
    Ok(Html(tera.render("post.html", &ctx)?))
}

async fn latest_post<S: PostService>(
    State((svc, tera)): State<PostsRouteState<S>>,
) -> Result<Html<String>, AppError> {
    let post = svc.latest_post().await?;

    let mut ctx = tera::Context::new();
    ctx.insert("post", &post);
    Ok(Html(tera.render("post.html", &ctx)?))
}

#[tracing::instrument(skip_all)]
async fn update_post<S: PostService>(
    State((svc, _)): State<PostsRouteState<S>>,
    Path(id): Path<i32>,
    Form(changes): Form<UpdatePost>,
) -> Result<Redirect, AppError> {
    svc.update_post(id, &changes).await?;
    info!(id, "post updated");

    Ok(Redirect::to(&format!("/post/{id}")))
}

#[tracing::instrument(skip_all)]
async fn delete_post<S: PostService>(
    State((svc, _)): State<PostsRouteState<S>>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    svc.delete_post(id).await?;
    info!(id, "post deleted");

    Ok(Redirect::to("/"))
}

pub fn router<S: PostService>() -> Router<PostsRouteState<S>> {
    Router::new()
        .route("/", get(index::<S>))
        .route("/post", get(latest_post::<S>).post(create_post::<S>))
        .route(
            "/post/:id",
            get(show_post::<S>)
                .put(update_post::<S>)
                .delete(delete_post::<S>),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::services::posts::PostServiceDb;
    use crate::services::testing::test_pool;

    async fn app() -> Router {
        let svc = PostServiceDb::new(test_pool().await);
        let tera = Tera::new("src/templates/**/*").unwrap();
        router::<PostServiceDb>().with_state((svc, tera))
    }

    fn form_req(method: Method, uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(res: axum::response::Response) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn create_redirects_home_and_index_lists_it_once() {
        let app = app().await;

        let res = app
            .clone()
            .oneshot(form_req(
                Method::POST,
                "/post",
                "title=Hello&body=This+is+a+post",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");

        // visiting the index again must not append another copy
        let _ = app.clone().oneshot(get_req("/")).await.unwrap();
        let res = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_string(res).await;
        assert_eq!(html.matches("This is a post").count(), 1);
        assert_eq!(html.matches("Hello").count(), 1);
    }

    #[tokio::test]
    async fn show_reflects_the_last_update() {
        let app = app().await;

        app.clone()
            .oneshot(form_req(Method::POST, "/post", "title=old&body=old+body"))
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(form_req(Method::PUT, "/post/1", "title=new&body=new+body"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/post/1");

        let res = app.oneshot(get_req("/post/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_string(res).await;
        assert!(html.contains("new"));
        assert!(html.contains("new body"));
        assert!(!html.contains("old body"));
    }

    #[tokio::test]
    async fn delete_removes_the_post() {
        let app = app().await;

        app.clone()
            .oneshot(form_req(Method::POST, "/post", "title=doomed&body=bye"))
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/post/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");

        let res = app.clone().oneshot(get_req("/")).await.unwrap();
        assert!(!body_string(res).await.contains("doomed"));

        let res = app.oneshot(get_req("/post/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn show_on_a_never_created_id_is_404() {
        let res = app().await.oneshot(get_req("/post/999")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_post_with_no_posts_is_404() {
        let res = app().await.oneshot(get_req("/post")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_post_shows_the_most_recent_post() {
        let app = app().await;

        app.clone()
            .oneshot(form_req(Method::POST, "/post", "title=first&body=a"))
            .await
            .unwrap();
        app.clone()
            .oneshot(form_req(Method::POST, "/post", "title=second&body=b"))
            .await
            .unwrap();

        let res = app.oneshot(get_req("/post")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_string(res).await;
        assert!(html.contains("second"));
        assert!(!html.contains("first"));
    }
}
