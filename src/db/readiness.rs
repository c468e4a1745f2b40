//! Startup readiness gate
//!
//! Blocks startup until the database answers a trivial probe query. The
//! application typically starts alongside its database container, so the
//! first connection attempts are expected to fail; the gate keeps probing
//! on a fixed interval until the store is reachable.

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tracing::{info, warn};

/// Probe retry policy.
///
/// The default preserves the historical startup behavior: one probe every
/// two seconds, forever. Set `max_attempts` to make an unreachable store a
/// fatal startup error instead of an indefinite stall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay between probe attempts
    pub interval: Duration,
    /// Maximum number of attempts; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: None,
        }
    }
}

/// Run `probe` until it succeeds, sleeping `policy.interval` between
/// attempts. With a bounded policy the final error is returned once the
/// attempt budget is spent.
pub async fn await_ready<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut probe: F,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match probe().await {
            Ok(value) => {
                info!(operation = operation_name, attempt, "dependency is ready");
                return Ok(value);
            }
            Err(err) => {
                if let Some(max) = policy.max_attempts {
                    if attempt >= max {
                        warn!(operation = operation_name, attempt, error = %err, "giving up waiting for dependency");
                        return Err(err);
                    }
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    retry_in_ms = policy.interval.as_millis() as u64,
                    error = %err,
                    "dependency not ready, retrying"
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}

/// Connect to the database, waiting until it answers a `SELECT 1` probe
pub async fn wait_for_database(
    url: &str,
    policy: &RetryPolicy,
) -> Result<DatabaseConnection, DbErr> {
    info!(url, "connecting to database");

    await_ready(
        policy,
        || async {
            let db = Database::connect(url).await?;
            db.execute(Statement::from_string(
                db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
            Ok(db)
        },
        "database",
    )
    .await
}
