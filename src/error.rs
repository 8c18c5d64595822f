use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(_) => {
                tracing::error!("Database error: {:?}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database unavailable".to_string(),
                )
            }
            _ => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
</head>
<body>
    <div class="error-page">
        <h1>Error {}</h1>
        <p>{}</p>
        <a href="/">Volver</a>
    </div>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            message
        );

        (status, Html(body)).into_response()
    }
}
