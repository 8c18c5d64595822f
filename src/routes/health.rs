//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is
//! running. The process only begins serving after the database readiness
//! gate has passed, so a responding process has seen the database at least
//! once.

/// Health check handler.
///
/// Returns a simple "ok" response to indicate the service is running.
pub async fn health() -> &'static str {
    "ok"
}
