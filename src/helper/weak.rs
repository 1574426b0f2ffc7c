//! Externally-owned connection helper with a non-owning reference.

use std::any::type_name;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::connection::Connection;
use crate::helper::api::ConnectionHelper;
use crate::helper::error::HelperError;
use crate::helper::runner::transact;
use crate::transaction::IsolationLevel;

/// Connection helper that borrows a caller-owned connection through a weak
/// reference.
///
/// Each operation resolves the live connection immediately before use and
/// fails with [`HelperError::Gone`] once the owner has dropped it. The
/// helper never disposes the connection and keeps it alive only for the
/// duration of a single resolved call.
pub struct WeakHelper<C: Connection> {
    conn: Weak<C>,
    default_isolation: IsolationLevel,
}

impl<C: Connection> WeakHelper<C> {
    /// Borrow `conn` without owning it.
    pub fn new(conn: &Arc<C>) -> Self {
        Self {
            conn: Arc::downgrade(conn),
            default_isolation: IsolationLevel::default(),
        }
    }

    /// Set the isolation level used by
    /// [`with_transaction`](ConnectionHelper::with_transaction).
    pub fn default_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.default_isolation = isolation;
        self
    }

    /// Resolve the live connection, failing if its owner dropped it.
    fn resolve(&self) -> Result<Arc<C>, HelperError<C::Error>> {
        self.conn.upgrade().ok_or(HelperError::Gone {
            connection: type_name::<C>(),
        })
    }
}

#[async_trait]
impl<C: Connection> ConnectionHelper for WeakHelper<C> {
    type Conn = C;

    async fn execute<T, E, W>(&self, task: W) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<C::Error>> + Send,
        W: for<'c> FnOnce(&'c C) -> BoxFuture<'c, Result<T, E>> + Send,
    {
        let conn = self.resolve().map_err(E::from)?;
        task(&*conn).await
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
        let conn = self.resolve().map_err(E::from)?;
        transact(&*conn, isolation, task).await
    }
}
