//! Externally-owned connection helper with disposal responsibility.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::warn;

use crate::connection::Connection;
use crate::helper::api::ConnectionHelper;
use crate::helper::error::HelperError;
use crate::helper::runner::transact;
use crate::transaction::IsolationLevel;

/// Connection helper that wraps a caller-created connection and takes over
/// its disposal.
///
/// The connection is lent to tasks as-is: the helper never opens it (the
/// caller is responsible for connection state) and never creates one. It
/// disposes the connection exactly once, on explicit
/// [`release`](OwnedHelper::release) or from `Drop` if the helper goes away
/// without one.
pub struct OwnedHelper<C: Connection> {
    conn: C,
    released: AtomicBool,
    default_isolation: IsolationLevel,
}

impl<C: Connection> OwnedHelper<C> {
    /// Take over a caller-created connection.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            released: AtomicBool::new(false),
            default_isolation: IsolationLevel::default(),
        }
    }

    /// Set the isolation level used by
    /// [`with_transaction`](ConnectionHelper::with_transaction).
    pub fn default_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.default_isolation = isolation;
        self
    }

    /// Dispose the wrapped connection.
    ///
    /// Idempotent: the first call disposes, later calls are no-ops. A
    /// disposal failure from this explicit path propagates to the caller;
    /// the connection still counts as released.
    pub fn release(&self) -> Result<(), C::Error> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.conn.dispose()
    }

    /// Lend the connection, failing once it has been released.
    fn guard(&self) -> Result<&C, HelperError<C::Error>> {
        if self.released.load(Ordering::Acquire) {
            return Err(HelperError::Released);
        }
        Ok(&self.conn)
    }
}

impl<C: Connection> Drop for OwnedHelper<C> {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        // Failures cannot surface from a destructor.
        if let Err(err) = self.conn.dispose() {
            warn!(error = %err, "connection disposal failed during drop");
        }
    }
}

#[async_trait]
impl<C: Connection> ConnectionHelper for OwnedHelper<C> {
    type Conn = C;

    async fn execute<T, E, W>(&self, task: W) -> Result<T, E>
    where
        T: Send,
        E: From<HelperError<C::Error>> + Send,
        W: for<'c> FnOnce(&'c C) -> BoxFuture<'c, Result<T, E>> + Send,
    {
        let conn = self.guard().map_err(E::from)?;
        task(conn).await
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
        let conn = self.guard().map_err(E::from)?;
        transact(conn, isolation, task).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::connection::fake::{
        failing_task, ok_task, value_task, Call, CallLog, FakeConnection, FakeError, Failures,
        TestError,
    };
    use crate::connection::ConnectionState;

    fn setup(failures: Failures) -> (OwnedHelper<FakeConnection>, Arc<CallLog>) {
        let (conn, log) = FakeConnection::fresh(ConnectionState::Open, failures);
        (OwnedHelper::new(conn), log)
    }

    #[tokio::test]
    async fn test_execute_lends_wrapped_connection() {
        let (helper, log) = setup(Failures::default());

        helper.execute(ok_task).await.unwrap();

        // No open, no dispose: the helper only lends the connection.
        assert_eq!(log.calls(), vec![Call::Task]);
    }

    #[tokio::test]
    async fn test_never_opens_closed_connection() {
        let (conn, log) = FakeConnection::fresh(ConnectionState::Closed, Failures::default());
        let helper = OwnedHelper::new(conn);

        helper.execute(ok_task).await.unwrap();

        assert_eq!(log.count(Call::Open), 0);
    }

    #[tokio::test]
    async fn test_with_transaction_commits_on_success() {
        let (helper, log) = setup(Failures::default());

        let value = helper.with_transaction(value_task).await.unwrap();

        assert_eq!(value, 42);
        assert_eq!(log.calls(), vec![Call::Begin, Call::Task, Call::Commit]);
    }

    #[tokio::test]
    async fn test_with_transaction_rolls_back_on_failure() {
        let (helper, log) = setup(Failures::default());

        let result: Result<(), TestError> = helper.with_transaction(failing_task).await;

        assert!(matches!(result, Err(TestError::Task("boom"))));
        assert_eq!(log.count(Call::Rollback), 1);
        assert_eq!(log.count(Call::Commit), 0);
        assert_eq!(log.count(Call::Dispose), 0);
    }

    #[tokio::test]
    async fn test_explicit_isolation() {
        let (helper, log) = setup(Failures::default());

        helper
            .with_transaction_isolation(IsolationLevel::ReadUncommitted, ok_task)
            .await
            .unwrap();

        assert_eq!(
            log.last_isolation(),
            Some(IsolationLevel::ReadUncommitted)
        );
    }

    #[tokio::test]
    async fn test_release_disposes_once() {
        let (helper, log) = setup(Failures::default());

        helper.release().unwrap();
        helper.release().unwrap();

        assert_eq!(log.count(Call::Dispose), 1);
    }

    #[tokio::test]
    async fn test_operations_fail_after_release() {
        let (helper, log) = setup(Failures::default());
        helper.release().unwrap();

        let execute: Result<(), TestError> = helper.execute(ok_task).await;
        let transact: Result<(), TestError> = helper.with_transaction(ok_task).await;

        assert!(matches!(
            execute,
            Err(TestError::Helper(HelperError::Released))
        ));
        assert!(matches!(
            transact,
            Err(TestError::Helper(HelperError::Released))
        ));
        // The connection was never touched after release.
        assert_eq!(log.calls(), vec![Call::Dispose]);
    }

    #[tokio::test]
    async fn test_drop_disposes_unreleased_connection() {
        let (helper, log) = setup(Failures::default());

        drop(helper);

        assert_eq!(log.count(Call::Dispose), 1);
    }

    #[tokio::test]
    async fn test_drop_after_release_does_not_double_dispose() {
        let (helper, log) = setup(Failures::default());

        helper.release().unwrap();
        drop(helper);

        assert_eq!(log.count(Call::Dispose), 1);
    }

    #[tokio::test]
    async fn test_explicit_release_propagates_dispose_failure() {
        let failures = Failures {
            dispose: true,
            ..Failures::default()
        };
        let (helper, log) = setup(failures);

        assert_eq!(helper.release(), Err(FakeError::Dispose));
        // Failed or not, the connection counts as released.
        assert_eq!(helper.release(), Ok(()));
        assert_eq!(log.count(Call::Dispose), 1);
    }

    #[tokio::test]
    async fn test_drop_swallows_dispose_failure() {
        let failures = Failures {
            dispose: true,
            ..Failures::default()
        };
        let (helper, log) = setup(failures);

        drop(helper);

        assert_eq!(log.count(Call::Dispose), 1);
    }
}
