//! Connection lifecycle states.

use std::fmt;

/// Lifecycle state reported by a database connection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// The connection is closed and must be opened before use.
    #[default]
    Closed,

    /// The connection is in the process of being established.
    Connecting,

    /// The connection is open and ready for work.
    Open,

    /// The connection failed and cannot be reused.
    Broken,
}

impl ConnectionState {
    /// Check if the connection can take work without being opened first.
    ///
    /// `Connecting` counts as usable: a handle mid-handshake becomes open on
    /// its own and must not be opened a second time.
    pub fn is_usable(&self) -> bool {
        matches!(self, ConnectionState::Open | ConnectionState::Connecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Closed => write!(f, "closed"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::Broken => write!(f, "broken"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(ConnectionState::default(), ConnectionState::Closed);
    }

    #[test]
    fn test_is_usable() {
        assert!(!ConnectionState::Closed.is_usable());
        assert!(ConnectionState::Connecting.is_usable());
        assert!(ConnectionState::Open.is_usable());
        assert!(!ConnectionState::Broken.is_usable());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert_eq!(ConnectionState::Broken.to_string(), "broken");
    }
}
