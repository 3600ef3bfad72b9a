//! Static page — one fixed HTML document for browser consumers.
//!
//! The file is read on every request so the page can be edited without a
//! restart.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::error;

pub const NOT_FOUND_BODY: &str = "404 (Not Found) - index.html missing";

#[derive(Clone)]
pub struct PageState {
    pub index_html: Arc<PathBuf>,
}

impl PageState {
    pub fn new(index_html: impl Into<PathBuf>) -> Self {
        Self { index_html: Arc::new(index_html.into()) }
    }
}

pub async fn index(State(page): State<PageState>) -> Response {
    match tokio::fs::read(page.index_html.as_path()).await {
        Ok(html) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response(),
        Err(e) => {
            error!(path = %page.index_html.display(), error = %e, "page: index.html missing");
            (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
        }
    }
}
