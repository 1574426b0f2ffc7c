//! Transaction handle contract.

use async_trait::async_trait;

/// A transaction obtained from a [`Connection`](crate::connection::Connection).
///
/// Commit and rollback both consume the handle: once a transaction is
/// resolved either way it cannot be touched again. Helpers guarantee that
/// every transaction they begin is resolved before the enclosing operation
/// returns.
#[async_trait]
pub trait Transaction: Send {
    /// Error type surfaced by the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Make the transaction's changes permanent.
    async fn commit(self) -> Result<(), Self::Error>;

    /// Discard the transaction's changes.
    async fn rollback(self) -> Result<(), Self::Error>;
}
