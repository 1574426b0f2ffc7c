//! dbscope - Scoped Database Connection Lifecycle
//!
//! This crate wraps the open/execute/commit/rollback/dispose boilerplate
//! around units of database work. A helper obtains a connection according to
//! its ownership policy, lends it to an async callback, optionally fences the
//! callback with a transaction, and releases the connection when the callback
//! returns.
//!
//! Three helpers cover the three ownership policies:
//!
//! - [`helper::FactoryHelper`] creates one connection per call and disposes
//!   it afterwards.
//! - [`helper::OwnedHelper`] wraps a caller-created connection and takes over
//!   its disposal.
//! - [`helper::WeakHelper`] borrows a caller-owned connection through a weak
//!   reference and never disposes it.
//!
//! # Example
//!
//! ```ignore
//! use dbscope::helper::{ConnectionHelper, FactoryHelper};
//!
//! let helper = FactoryHelper::new(|| PgConnection::from_env());
//!
//! // One connection per call, committed on success, rolled back on error.
//! let inserted = helper
//!     .with_transaction(|conn| Box::pin(async move {
//!         conn.execute("INSERT INTO users (name) VALUES ('Alice')").await
//!     }))
//!     .await?;
//! ```

pub mod connection;
pub mod helper;
pub mod transaction;
