//! Connection lifecycle helpers.
//!
//! This module implements the [`ConnectionHelper`] contract three times,
//! once per connection ownership policy. All three run the caller's task the
//! same way; they differ only in how the connection is obtained and released.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ConnectionHelper                        │
//! │     (execute / with_transaction / ..._isolation)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │   Factory   │       │    Owned    │       │    Weak     │
//!  │ (per-call)  │       │ (wraps one) │       │ (borrows)   │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//! ```
//!
//! - [`FactoryHelper`] asks a factory closure for a fresh connection on
//!   every call, opens it if needed, and disposes it afterwards.
//! - [`OwnedHelper`] wraps one caller-created connection for its whole
//!   lifetime and disposes it exactly once.
//! - [`WeakHelper`] resolves a weak reference on every call and never
//!   disposes the connection.
//!
//! # Usage
//!
//! ```ignore
//! use dbscope::helper::{ConnectionHelper, OwnedHelper};
//! use dbscope::transaction::IsolationLevel;
//!
//! let helper = OwnedHelper::new(connection);
//!
//! let total = helper
//!     .with_transaction_isolation(IsolationLevel::Serializable, |conn| {
//!         Box::pin(async move {
//!             conn.execute("UPDATE accounts SET balance = balance - 10").await?;
//!             conn.query_scalar("SELECT SUM(balance) FROM accounts").await
//!         })
//!     })
//!     .await?;
//!
//! helper.release()?;
//! ```

mod api;
mod error;
mod factory;
mod owned;
mod runner;
mod weak;

pub use api::ConnectionHelper;
pub use error::{HelperError, HelperResult};
pub use factory::FactoryHelper;
pub use owned::OwnedHelper;
pub use weak::WeakHelper;
