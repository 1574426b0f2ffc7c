//! Factory-based connection helper.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::helper::api::ConnectionHelper;
use crate::helper::error::HelperError;
use crate::helper::runner::transact;
use crate::transaction::IsolationLevel;

/// Lift a driver failure into the caller's error type.
fn lift<CE, E>(err: CE) -> E
where
    E: From<HelperError<CE>>,
{
    E::from(HelperError::Connection(err))
}

/// Connection helper that creates one connection per call.
///
/// The factory closure is invoked at the start of every operation; the
/// produced connection is opened if it is not already open or connecting,
/// lent to the task, and disposed on every exit path before the operation
/// returns. Concurrent operations never share a connection.
pub struct FactoryHelper<C, F> {
    factory: F,
    default_isolation: IsolationLevel,
    _conn: PhantomData<fn() -> C>,
}

impl<C, F> FactoryHelper<C, F>
where
    C: Connection,
    F: Fn() -> C + Send + Sync,
{
    /// Create a helper around a connection factory.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            default_isolation: IsolationLevel::default(),
            _conn: PhantomData,
        }
    }

    /// Set the isolation level used by
    /// [`with_transaction`](ConnectionHelper::with_transaction).
    pub fn default_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.default_isolation = isolation;
        self
    }

    /// Open the connection unless it is already open or connecting.
    async fn ensure_open(conn: &C) -> Result<(), C::Error> {
        if conn.state().is_usable() {
            return Ok(());
        }
        debug!(state = %conn.state(), "opening factory connection");
        conn.open().await
    }

    /// Dispose `conn`, folding a disposal failure into the call result.
    ///
    /// The task's own failure always wins; a disposal failure after a
    /// successful task surfaces to the caller.
    fn finish<T, E>(conn: C, result: Result<T, E>) -> Result<T, E>
    where
        E: From<HelperError<C::Error>>,
    {
        match (result, conn.dispose()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(dispose_err)) => Err(lift(dispose_err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(dispose_err)) => {
                warn!(error = %dispose_err, "connection disposal failed after task error");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<C, F> ConnectionHelper for FactoryHelper<C, F>
where
    C: Connection,
    F: Fn() -> C + Send + Sync,
{
    type Conn = C;

    async fn execute<T, E, W>(&self, task: W) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<C::Error>> + Send,
        W: for<'c> FnOnce(&'c C) -> BoxFuture<'c, Result<T, E>> + Send,
    {
        let conn = (self.factory)();
        let result = match Self::ensure_open(&conn).await {
            Ok(()) => task(&conn).await,
            Err(open_err) => Err(lift(open_err)),
        };
        Self::finish(conn, result)
    }

    async fn with_transaction<T, E, W>(&self, task: W) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<C::Error>> + Send,
        W: for<'c> FnOnce(&'c C) -> BoxFuture<'c, Result<T, E>> + Send,
    {
        self.with_transaction_isolation(self.default_isolation, task)
            .await
    }

    async fn with_transaction_isolation<T, E, W>(
        &self,
        isolation: IsolationLevel,
        task: W,
    ) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<C::Error>> + Send,
        W: for<'c> FnOnce(&'c C) -> BoxFuture<'c, Result<T, E>> + Send,
    {
        let conn = (self.factory)();
        let result = match Self::ensure_open(&conn).await {
            Ok(()) => transact(&conn, isolation, task).await,
            Err(open_err) => Err(lift(open_err)),
        };
        Self::finish(conn, result)
    }
}
