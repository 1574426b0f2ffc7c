//! Capability contract shared by the three connection helpers.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::connection::Connection;
use crate::helper::error::HelperError;
use crate::transaction::IsolationLevel;

/// Runs caller-supplied units of work against a live database connection.
///
/// Tasks are async closures handed a `&Conn` for the duration of one call:
///
/// ```ignore
/// helper.execute(|conn| Box::pin(async move {
///     conn.query("SELECT 1").await
/// })).await?;
/// ```
///
/// Operations are generic over the task's error type `E`; helper and driver
/// failures lift into `E` through `From<HelperError<_>>`, while the task's
/// own failures are returned to the caller unchanged. `HelperError` itself
/// satisfies the bound, so callers without their own error type can use it
/// directly.
#[async_trait]
pub trait ConnectionHelper: Send + Sync {
    /// The connection type lent to tasks.
    type Conn: Connection;

    /// Run `task` against a live connection, without a transaction.
    ///
    /// The task's result, `Ok` or `Err`, is handed back as-is once the
    /// connection has been released per the helper's ownership policy.
    async fn execute<T, E, W>(&self, task: W) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<<Self::Conn as Connection>::Error>> + Send,
        W: for<'c> FnOnce(&'c Self::Conn) -> BoxFuture<'c, Result<T, E>> + Send;

    /// Run `task` inside a transaction at the helper's default isolation
    /// level.
    ///
    /// The transaction commits when the task returns `Ok` and rolls back
    /// when it returns `Err`; either way it is resolved before this call
    /// returns.
    async fn with_transaction<T, E, W>(&self, task: W) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<<Self::Conn as Connection>::Error>> + Send,
        W: for<'c> FnOnce(&'c Self::Conn) -> BoxFuture<'c, Result<T, E>> + Send;

    /// Run `task` inside a transaction at the given isolation level.
    async fn with_transaction_isolation<T, E, W>(
        &self,
        isolation: IsolationLevel,
        task: W,
    ) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<<Self::Conn as Connection>::Error>> + Send,
        W: for<'c> FnOnce(&'c Self::Conn) -> BoxFuture<'c, Result<T, E>> + Send;
}
