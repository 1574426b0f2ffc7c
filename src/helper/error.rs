//! Helper error types.

use thiserror::Error;

/// Result type for helper operations.
pub type HelperResult<T, E> = Result<T, HelperError<E>>;

/// Errors surfaced by the connection helpers themselves.
///
/// `E` is the underlying connection's error type. A task's own failure is
/// never wrapped in this enum: operations hand it back unchanged and lift
/// only structural and driver failures through `From`.
#[derive(Debug, Error)]
pub enum HelperError<E> {
    /// The underlying connection or transaction reported a failure.
    #[error("connection error: {0}")]
    Connection(#[source] E),

    /// The helper was released and can no longer lend its connection.
    #[error("connection helper already released")]
    Released,

    /// The weakly referenced connection no longer exists.
    #[error("connection `{connection}` no longer exists")]
    Gone {
        /// Type name of the vanished connection.
        connection: &'static str,
    },
}

impl<E> HelperError<E> {
    /// Check if the failure came from the driver rather than from the
    /// helper's own lifecycle guards.
    pub fn is_connection(&self) -> bool {
        matches!(self, HelperError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::fake::FakeError;

    #[test]
    fn test_display() {
        let err: HelperError<FakeError> = HelperError::Connection(FakeError::Dispose);
        assert_eq!(err.to_string(), "connection error: dispose failed");

        let err: HelperError<FakeError> = HelperError::Released;
        assert_eq!(err.to_string(), "connection helper already released");

        let err: HelperError<FakeError> = HelperError::Gone {
            connection: "PgConnection",
        };
        assert_eq!(err.to_string(), "connection `PgConnection` no longer exists");
    }

    #[test]
    fn test_is_connection() {
        let err: HelperError<FakeError> = HelperError::Connection(FakeError::Open);
        assert!(err.is_connection());

        let err: HelperError<FakeError> = HelperError::Released;
        assert!(!err.is_connection());
    }

    #[test]
    fn test_source_preserved() {
        use std::error::Error as _;

        let err: HelperError<FakeError> = HelperError::Connection(FakeError::Commit);
        let source = err.source().expect("driver failure should be the source");
        assert_eq!(source.to_string(), "commit failed");
    }
}
