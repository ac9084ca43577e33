use std::fmt::Debug;
use std::fmt::Display;

use axum::response::Html;
use axum::{http::StatusCode, response::IntoResponse};

pub struct AppError {
    pub inner: anyhow::Error,
}

// Tell axum how to convert `AppError` into a response. Diesel's NotFound
// surfaces as 404 (lookup by id on an absent row), everything else is a 500.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self.inner.downcast_ref::<diesel::result::Error>() {
            Some(diesel::result::Error::NotFound) => {
                (StatusCode::NOT_FOUND, Html("Not found".to_string())).into_response()
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Something went wrong: {}", self.inner)),
            )
                .into_response(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

impl Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>` to turn them into
// `Result<_, AppError>`. That way you don't need to do that manually.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self { inner: err.into() }
    }
}
