//! Instrumented fake connection shared by the helper test modules.
//!
//! Records every lifecycle call in order and can be scripted to fail any of
//! them, so tests can assert exact call counts and sequencing.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use thiserror::Error;

use crate::connection::{Connection, ConnectionState};
use crate::helper::HelperError;
use crate::transaction::{IsolationLevel, Transaction};

/// Error type surfaced by the fake driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum FakeError {
    #[error("open failed")]
    Open,

    #[error("commit failed")]
    Commit,

    #[error("rollback failed")]
    Rollback,

    #[error("dispose failed")]
    Dispose,
}

/// A lifecycle call observed by the fake driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Open,
    Begin,
    Task,
    Commit,
    Rollback,
    Dispose,
}

/// Ordered record of lifecycle calls, shared between a fake connection and
/// the transactions it hands out.
#[derive(Debug, Default)]
pub(crate) struct CallLog {
    calls: Mutex<Vec<Call>>,
    last_isolation: Mutex<Option<IsolationLevel>>,
}

impl CallLog {
    pub(crate) fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn record_begin(&self, isolation: IsolationLevel) {
        self.record(Call::Begin);
        *self.last_isolation.lock() = Some(isolation);
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.calls.lock().iter().filter(|c| **c == call).count()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub(crate) fn last_isolation(&self) -> Option<IsolationLevel> {
        *self.last_isolation.lock()
    }
}

/// Failure switches for the fake driver.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Failures {
    pub open: bool,
    pub commit: bool,
    pub rollback: bool,
    pub dispose: bool,
}

/// In-memory connection that records lifecycle calls instead of touching a
/// database.
pub(crate) struct FakeConnection {
    state: Mutex<ConnectionState>,
    failures: Failures,
    log: Arc<CallLog>,
}

impl FakeConnection {
    pub(crate) fn with_log(
        state: ConnectionState,
        failures: Failures,
        log: Arc<CallLog>,
    ) -> Self {
        Self {
            state: Mutex::new(state),
            failures,
            log,
        }
    }

    /// Build a fake connection together with a handle on its call log.
    pub(crate) fn fresh(
        state: ConnectionState,
        failures: Failures,
    ) -> (Self, Arc<CallLog>) {
        let log = Arc::new(CallLog::default());
        (Self::with_log(state, failures, log.clone()), log)
    }

    /// Stand-in for task work against the connection.
    pub(crate) async fn run(&self) {
        self.log.record(Call::Task);
    }
}

#[async_trait]
impl Connection for FakeConnection {
    type Error = FakeError;
    type Tx = FakeTransaction;

    fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    async fn open(&self) -> Result<(), FakeError> {
        self.log.record(Call::Open);
        if self.failures.open {
            return Err(FakeError::Open);
        }
        *self.state.lock() = ConnectionState::Open;
        Ok(())
    }

    async fn begin(&self, isolation: IsolationLevel) -> Result<FakeTransaction, FakeError> {
        self.log.record_begin(isolation);
        Ok(FakeTransaction {
            failures: self.failures,
            log: self.log.clone(),
        })
    }

    fn dispose(&self) -> Result<(), FakeError> {
        self.log.record(Call::Dispose);
        *self.state.lock() = ConnectionState::Closed;
        if self.failures.dispose {
            return Err(FakeError::Dispose);
        }
        Ok(())
    }
}

/// Transaction handle produced by [`FakeConnection`].
pub(crate) struct FakeTransaction {
    failures: Failures,
    log: Arc<CallLog>,
}

#[async_trait]
impl Transaction for FakeTransaction {
    type Error = FakeError;

    async fn commit(self) -> Result<(), FakeError> {
        self.log.record(Call::Commit);
        if self.failures.commit {
            return Err(FakeError::Commit);
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), FakeError> {
        self.log.record(Call::Rollback);
        if self.failures.rollback {
            return Err(FakeError::Rollback);
        }
        Ok(())
    }
}

/// Error type for tasks in tests: its own failures stay distinguishable
/// from anything the helper lifts into it.
#[derive(Debug)]
pub(crate) enum TestError {
    Task(&'static str),
    Helper(HelperError<FakeError>),
}

impl From<HelperError<FakeError>> for TestError {
    fn from(err: HelperError<FakeError>) -> Self {
        TestError::Helper(err)
    }
}

pub(crate) type TaskResult<T> = Result<T, TestError>;

/// Task that touches the connection and succeeds.
pub(crate) fn ok_task(conn: &FakeConnection) -> BoxFuture<'_, TaskResult<()>> {
    Box::pin(async move {
        conn.run().await;
        Ok(())
    })
}

/// Task that touches the connection and returns a value.
pub(crate) fn value_task(conn: &FakeConnection) -> BoxFuture<'_, TaskResult<u64>> {
    Box::pin(async move {
        conn.run().await;
        Ok(42)
    })
}

/// Task that touches the connection and fails with its own error.
pub(crate) fn failing_task(conn: &FakeConnection) -> BoxFuture<'_, TaskResult<()>> {
    Box::pin(async move {
        conn.run().await;
        Err(TestError::Task("boom"))
    })
}
