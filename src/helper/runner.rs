//! Shared transactional execution sequence.
//!
//! Once a helper holds a live connection, the transactional path is the same
//! for all ownership policies: begin, run the task, commit on `Ok`, roll
//! back on `Err`. Only connection acquisition and release differ per helper.

use futures::future::BoxFuture;
use tracing::{debug, error};
use ulid::Ulid;

use crate::connection::Connection;
use crate::helper::error::HelperError;
use crate::transaction::{IsolationLevel, Transaction};

/// Run `task` inside a transaction on an already-acquired connection.
///
/// The transaction is always resolved before this returns: committed when
/// the task succeeds, rolled back when it fails. The task's own error is
/// returned unchanged; a rollback failure cannot displace it and is logged
/// instead.
pub(crate) async fn transact<C, T, E, W>(
    conn: &C,
    isolation: IsolationLevel,
    task: W,
) -> Result<T, E>
where
    C: Connection,
    T: Send,
    E: From<HelperError<C::Error>> + Send,
    W: for<'c> FnOnce(&'c C) -> BoxFuture<'c, Result<T, E>> + Send,
{
    let op = Ulid::new();
    let tx = conn
        .begin(isolation)
        .await
        .map_err(HelperError::Connection)?;
    debug!(%op, %isolation, "transaction started");

    match task(conn).await {
        Ok(value) => {
            tx.commit().await.map_err(HelperError::Connection)?;
            debug!(%op, "transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(%op, error = %rollback_err, "rollback failed; returning the task error");
            } else {
                debug!(%op, "transaction rolled back");
            }
            Err(err)
        }
    }
}
