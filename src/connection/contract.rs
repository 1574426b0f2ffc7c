//! Database connection contract.

use async_trait::async_trait;

use crate::connection::ConnectionState;
use crate::transaction::{IsolationLevel, Transaction};

/// A live database session.
///
/// Implemented over the caller's driver handle. The helpers only ever use
/// the lifecycle surface below; everything else the concrete type offers
/// (queries, commands, prepared statements) is reached by tasks through the
/// `&C` they are handed.
///
/// Methods take `&self`: a connection shared with a task across `.await`
/// points cannot hand out `&mut`, so implementations keep their mutable
/// state behind interior mutability, the way async drivers already do.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Error type surfaced by the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Transaction handle produced by [`begin`](Connection::begin).
    type Tx: Transaction<Error = Self::Error>;

    /// Current lifecycle state as reported by the driver.
    fn state(&self) -> ConnectionState;

    /// Establish the session.
    async fn open(&self) -> Result<(), Self::Error>;

    /// Begin a transaction at the given isolation level.
    async fn begin(&self, isolation: IsolationLevel) -> Result<Self::Tx, Self::Error>;

    /// Tear the session down and release its underlying resources.
    ///
    /// Synchronous so that it stays callable from `Drop` implementations.
    /// Must tolerate being called on a never-opened connection.
    fn dispose(&self) -> Result<(), Self::Error>;
}
