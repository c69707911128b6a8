//! Database availability probe
//!
//! Used at startup (and by the `wait-for-db` command) to block until the
//! database accepts connections.

use crate::core::error::{Result, RosterError};
use crate::db::manager::DatabaseManager;
use std::time::Duration;
use tracing::{info, warn};

/// Poll `db` every `interval` until a connection answers `SELECT 1`.
///
/// `max_attempts == 0` waits indefinitely; otherwise the last failure is
/// returned as [`RosterError::DatabaseUnavailable`] once the attempts run out.
pub async fn wait_for_db(
    db: &DatabaseManager,
    interval: Duration,
    max_attempts: u32,
) -> Result<()> {
    info!(path = ?db.db_path(), "waiting for database...");

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        let probe = db.clone();
        let outcome = tokio::task::spawn_blocking(move || probe.ping())
            .await
            .map_err(|e| RosterError::TaskError(format!("Database probe panicked: {}", e)))?;

        match outcome {
            Ok(()) => {
                info!(attempts = attempt, "database available");
                return Ok(());
            }
            Err(e) if max_attempts != 0 && attempt >= max_attempts => {
                warn!(attempts = attempt, error = %e, "database still unavailable, giving up");
                return Err(RosterError::DatabaseUnavailable(format!(
                    "gave up after {} attempts: {}",
                    attempt, e
                )));
            }
            Err(e) => {
                warn!(attempt, error = %e, "database unavailable, waiting...");
                tokio::time::sleep(interval).await;
            }
        }
    }
}
