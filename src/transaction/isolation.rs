//! Transaction isolation levels.
//!
//! Every transaction a helper begins carries an isolation level. Callers can
//! pass one explicitly; otherwise the helper's default applies, which is
//! `Snapshot` unless reconfigured.

use std::fmt;

/// Transaction isolation level.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Read Uncommitted isolation.
    ///
    /// Reads may observe uncommitted changes from concurrent transactions
    /// (dirty reads). The weakest level most engines offer.
    ReadUncommitted,

    /// Read Committed isolation.
    ///
    /// Each read sees the most recently committed data at the time of the
    /// read. Different reads within the same transaction might see different
    /// data if another transaction commits in between.
    ReadCommitted,

    /// Repeatable Read isolation.
    ///
    /// Rows read once within the transaction read the same way for its
    /// entire duration. Phantom rows may still appear in range queries
    /// depending on the engine.
    RepeatableRead,

    /// Serializable isolation.
    ///
    /// Transactions behave as if executed one after another. The strongest
    /// and most conflict-prone level.
    Serializable,

    /// Snapshot isolation.
    ///
    /// All reads within the transaction see a consistent snapshot of the
    /// database as of the transaction's start. Writes conflict at commit
    /// time instead of blocking readers.
    #[default]
    Snapshot,
}

impl IsolationLevel {
    /// Check if this isolation level gives the transaction a stable view of
    /// data it has already read.
    pub fn uses_snapshot(&self) -> bool {
        matches!(
            self,
            IsolationLevel::RepeatableRead | IsolationLevel::Snapshot
        )
    }

    /// Get a human-readable description of this isolation level.
    pub fn description(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => {
                "Reads may observe uncommitted changes from other transactions"
            }
            IsolationLevel::ReadCommitted => {
                "Each read sees the latest committed data"
            }
            IsolationLevel::RepeatableRead => {
                "Rows read once keep reading the same way for the transaction"
            }
            IsolationLevel::Serializable => {
                "Transactions behave as if executed one after another"
            }
            IsolationLevel::Snapshot => {
                "All reads see a consistent snapshot from transaction start"
            }
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsolationLevel::ReadUncommitted => write!(f, "READ UNCOMMITTED"),
            IsolationLevel::ReadCommitted => write!(f, "READ COMMITTED"),
            IsolationLevel::RepeatableRead => write!(f, "REPEATABLE READ"),
            IsolationLevel::Serializable => write!(f, "SERIALIZABLE"),
            IsolationLevel::Snapshot => write!(f, "SNAPSHOT"),
        }
    }
}

/// Parse isolation level from string (SQL syntax).
impl std::str::FromStr for IsolationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "READ UNCOMMITTED" | "READ_UNCOMMITTED" | "READUNCOMMITTED" => {
                Ok(IsolationLevel::ReadUncommitted)
            }
            "READ COMMITTED" | "READ_COMMITTED" | "READCOMMITTED" => {
                Ok(IsolationLevel::ReadCommitted)
            }
            "REPEATABLE READ" | "REPEATABLE_READ" | "REPEATABLEREAD" => {
                Ok(IsolationLevel::RepeatableRead)
            }
            "SERIALIZABLE" => Ok(IsolationLevel::Serializable),
            "SNAPSHOT" => Ok(IsolationLevel::Snapshot),
            _ => Err(format!("unknown isolation level: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_isolation() {
        assert_eq!(IsolationLevel::default(), IsolationLevel::Snapshot);
    }

    #[test]
    fn test_uses_snapshot() {
        assert!(!IsolationLevel::ReadUncommitted.uses_snapshot());
        assert!(!IsolationLevel::ReadCommitted.uses_snapshot());
        assert!(IsolationLevel::RepeatableRead.uses_snapshot());
        assert!(!IsolationLevel::Serializable.uses_snapshot());
        assert!(IsolationLevel::Snapshot.uses_snapshot());
    }

    #[test]
    fn test_parse_isolation() {
        assert_eq!(
            "READ COMMITTED".parse::<IsolationLevel>().unwrap(),
            IsolationLevel::ReadCommitted
        );
        assert_eq!(
            "repeatable_read".parse::<IsolationLevel>().unwrap(),
            IsolationLevel::RepeatableRead
        );
        assert_eq!(
            "snapshot".parse::<IsolationLevel>().unwrap(),
            IsolationLevel::Snapshot
        );
        assert!("chaos".parse::<IsolationLevel>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(IsolationLevel::Snapshot.to_string(), "SNAPSHOT");
        assert_eq!(
            IsolationLevel::ReadUncommitted.to_string(),
            "READ UNCOMMITTED"
        );
    }
}
