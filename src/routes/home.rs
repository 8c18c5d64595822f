//! Handler for the message page.
//!
//! Fetches the single message row and renders it either interpolated into
//! the `index.html` template or as a raw text body, depending on the
//! configured page format. When the table holds no row, a fixed fallback
//! string is shown instead.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tracing::instrument;

use crate::config::{PageFormat, FALLBACK_MESSAGE};
use crate::error::AppError;
use crate::state::AppState;

/// Message page handler.
///
/// A database error propagates as [`AppError::Database`] and surfaces as
/// the generic error page; there is no request-level retry.
#[instrument(name = "home::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let message = state
        .messages
        .latest()
        .await?
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

    match state.config.ui.format {
        PageFormat::Text => Ok(message.into_response()),
        PageFormat::Html => {
            let mut context = tera::Context::new();
            context.insert("config", &state.config.ui);
            context.insert("message", &message);

            let html = state.tera.render("index.html", &context)?;
            Ok(Html(html).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::{AppConfig, PageFormat, FALLBACK_MESSAGE};
    use crate::db::MockMessageRepository;
    use crate::error::AppError;
    use crate::routes::create_router;
    use crate::state::AppState;
    use crate::templates::init_templates;

    fn state_with(repo: MockMessageRepository, format: PageFormat) -> AppState {
        let mut config = AppConfig::default();
        config.ui.format = format;
        let tera = init_templates().expect("templates load");
        AppState::new(config, tera, Arc::new(repo))
    }

    async fn get_root(state: AppState) -> (StatusCode, String) {
        let app = create_router(state);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_renders_message_in_html_page() {
        let mut repo = MockMessageRepository::new();
        repo.expect_latest()
            .times(1)
            .returning(|| Ok(Some("hola".to_string())));

        let (status, body) = get_root(state_with(repo, PageFormat::Html)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hola"));
        assert!(body.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_index_renders_message_as_plain_text() {
        let mut repo = MockMessageRepository::new();
        repo.expect_latest()
            .times(1)
            .returning(|| Ok(Some("hola".to_string())));

        let (status, body) = get_root(state_with(repo, PageFormat::Text)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hola");
    }

    #[tokio::test]
    async fn test_index_falls_back_when_table_is_empty() {
        let mut repo = MockMessageRepository::new();
        repo.expect_latest().times(1).returning(|| Ok(None));

        let (status, body) = get_root(state_with(repo, PageFormat::Html)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_index_surfaces_database_error_as_503() {
        let mut repo = MockMessageRepository::new();
        repo.expect_latest()
            .times(1)
            .returning(|| Err(AppError::Database(sqlx::Error::PoolClosed)));

        let (status, body) = get_root(state_with(repo, PageFormat::Html)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Database unavailable"));
    }

    #[tokio::test]
    async fn test_index_queries_repository_once_per_request() {
        // Two sequential requests, exactly two repository queries
        let mut repo = MockMessageRepository::new();
        repo.expect_latest()
            .times(2)
            .returning(|| Ok(Some("hola".to_string())));

        let state = state_with(repo, PageFormat::Text);
        let app = create_router(state);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_index_sets_cache_control_header() {
        let mut repo = MockMessageRepository::new();
        repo.expect_latest()
            .returning(|| Ok(Some("hola".to_string())));

        let app = create_router(state_with(repo, PageFormat::Html));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let cache_control = response
            .headers()
            .get(header::CACHE_CONTROL)
            .expect("cache-control header present");
        assert_eq!(cache_control, crate::config::CACHE_CONTROL_MESSAGE);
    }
}
