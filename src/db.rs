//! Database readiness gate, connection pool, and the message repository.
//!
//! The readiness gate blocks startup until MySQL accepts a connection:
//! it probes with a throwaway connection at a fixed interval, forever,
//! logging each failed attempt. Only after the gate opens is the real
//! pool created and the HTTP listener bound.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions};
use sqlx::Connection;
use tracing::instrument;

use crate::config::{DatabaseConfig, DB_READY_RETRY_SECS};
use crate::error::Result;

/// Build MySQL connection options from the database configuration.
fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
}

/// Block until the database accepts a connection.
///
/// Probes with a dedicated connection (connect, ping, close) every
/// [`DB_READY_RETRY_SECS`] seconds with no attempt cap: an unreachable
/// database keeps the process waiting until it comes up or the process is
/// terminated. Each failed attempt logs a warning.
#[instrument(name = "db.wait_for_database", skip(config), fields(host = %config.host, database = %config.name))]
pub async fn wait_for_database(config: &DatabaseConfig) {
    let options = connect_options(config);
    let options = &options;
    let interval = Duration::from_secs(DB_READY_RETRY_SECS);

    let attempts = retry_until_ok(
        move || async move {
            let mut conn = MySqlConnection::connect_with(options).await?;
            conn.ping().await?;
            conn.close().await?;
            Ok::<(), sqlx::Error>(())
        },
        interval,
    )
    .await;

    tracing::info!(attempts, "Database ready");
}

/// Retry `probe` at a fixed interval until it succeeds, returning the
/// number of attempts taken. Failures are logged, never surfaced.
async fn retry_until_ok<F, Fut, E>(mut probe: F, interval: Duration) -> u64
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    E: std::fmt::Display,
{
    let mut attempt: u64 = 1;
    loop {
        match probe().await {
            Ok(()) => return attempt,
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Database not ready, retrying");
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
        }
    }
}

/// Create the connection pool used by request handlers.
pub async fn create_pool(config: &DatabaseConfig) -> std::result::Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options(config))
        .await
}

/// Read access to the one message this service displays.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Fetch the message text, if the table holds a row.
    async fn latest(&self) -> Result<Option<String>>;
}

/// MySQL-backed message repository.
pub struct MySqlMessageRepository {
    pool: MySqlPool,
}

impl MySqlMessageRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for MySqlMessageRepository {
    async fn latest(&self) -> Result<Option<String>> {
        // The table carries no key to order by; it is expected to hold one row.
        let row = sqlx::query_scalar::<_, String>("SELECT texto FROM mensajes LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
