//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::db::MessageRepository;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, Tera template engine, and the
/// repository the message is read from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub messages: Arc<dyn MessageRepository>,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and repository.
    pub fn new(config: AppConfig, tera: Tera, messages: Arc<dyn MessageRepository>) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            messages,
        }
    }
}
